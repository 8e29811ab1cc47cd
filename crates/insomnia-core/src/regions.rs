//! Fixed region codes that partition store-search requests.

use crate::ConfigError;

/// Every region the store locator is queried for: the 50 US states plus DC.
pub const REGION_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Parse a user-supplied region code, case-insensitively, into its canonical
/// entry in [`REGION_CODES`].
///
/// # Errors
///
/// Returns [`ConfigError::UnknownRegion`] if the code is not in the fixed set.
pub fn parse_region_code(raw: &str) -> Result<&'static str, ConfigError> {
    let upper = raw.trim().to_ascii_uppercase();
    REGION_CODES
        .iter()
        .copied()
        .find(|code| *code == upper)
        .ok_or_else(|| ConfigError::UnknownRegion(raw.trim().to_string()))
}

/// Resolve an optional filter into the list of regions to query.
///
/// An empty filter selects every region. A non-empty filter is validated,
/// de-duplicated, and returned in [`REGION_CODES`] order.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownRegion`] for the first unrecognized code.
pub fn resolve_regions<S: AsRef<str>>(filter: &[S]) -> Result<Vec<&'static str>, ConfigError> {
    if filter.is_empty() {
        return Ok(REGION_CODES.to_vec());
    }

    let mut wanted = Vec::with_capacity(filter.len());
    for raw in filter {
        wanted.push(parse_region_code(raw.as_ref())?);
    }

    Ok(REGION_CODES
        .iter()
        .copied()
        .filter(|code| wanted.contains(code))
        .collect())
}
