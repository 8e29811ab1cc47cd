//! Store record mapping from raw search entries to [`PoiRecord`].
//!
//! Mapping runs in two steps: [`validate_store`] checks presence and type of
//! every field up front and produces a [`ValidatedStore`], then [`map_store`]
//! builds the output record from that typed value.

use insomnia_core::{PoiRecord, StoreRef};
use serde_json::Value;

use crate::error::ScraperError;
use crate::hours::parse_store_hours;

/// Placeholder used in errors raised before the store `id` is known.
const UNKNOWN_REF: &str = "<unknown>";

/// A store entry whose fields have all been checked and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedStore {
    pub store_ref: StoreRef,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub phone: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

/// Stores mapped from one region's response.
#[derive(Debug, Default)]
pub struct NormalizedStores {
    pub records: Vec<PoiRecord>,
    /// Entries dropped because they failed validation.
    pub skipped: usize,
}

/// Validate one raw `stores[]` entry.
///
/// # Errors
///
/// - [`ScraperError::MissingField`] if `store_info` or `id` is absent, or a
///   required string (`name`, `address`, `city`, `state`, `zip`) is absent or
///   not a string. A present but blank string is kept as empty.
/// - [`ScraperError::InvalidCoordinate`] if `store_lat`/`store_lon` is not a
///   finite number.
pub fn validate_store(store: &Value) -> Result<ValidatedStore, ScraperError> {
    let info = store
        .get("store_info")
        .filter(|v| v.is_object())
        .ok_or(ScraperError::MissingField {
            store_ref: UNKNOWN_REF.to_string(),
            field: "store_info",
        })?;

    let store_ref = parse_store_ref(info.get("id")).ok_or(ScraperError::MissingField {
        store_ref: UNKNOWN_REF.to_string(),
        field: "id",
    })?;
    let ref_label = store_ref.to_string();

    let required = |field: &'static str| -> Result<String, ScraperError> {
        required_str(info, field).ok_or_else(|| ScraperError::MissingField {
            store_ref: ref_label.clone(),
            field,
        })
    };

    Ok(ValidatedStore {
        name: required("name")?,
        address: required("address")?,
        city: required("city")?,
        state: required("state")?,
        postcode: required("zip")?,
        phone: trimmed_str(info, "phone"),
        lat: parse_coordinate(info, "store_lat", &ref_label)?,
        lon: parse_coordinate(info, "store_lon", &ref_label)?,
        open_time: trimmed_str(info, "store_open"),
        close_time: trimmed_str(info, "store_close"),
        store_ref,
    })
}

/// Build the output record for a validated store.
///
/// `website` is the URL of the search response the store came from.
#[must_use]
pub fn map_store(store: ValidatedStore, website: &str) -> PoiRecord {
    let opening_hours = parse_store_hours(store.open_time.as_deref(), store.close_time.as_deref());

    PoiRecord {
        name: store.name,
        store_ref: store.store_ref,
        addr_full: store.address,
        city: store.city,
        state: store.state,
        postcode: store.postcode,
        phone: store.phone,
        website: website.to_string(),
        lat: store.lat,
        lon: store.lon,
        opening_hours,
    }
}

/// Validate and map one raw store entry.
///
/// # Errors
///
/// Propagates any error from [`validate_store`].
pub fn normalize_store(store: &Value, website: &str) -> Result<PoiRecord, ScraperError> {
    validate_store(store).map(|validated| map_store(validated, website))
}

/// Map every entry of a region's `stores` list, skipping malformed entries
/// with a warning instead of failing the region.
#[must_use]
pub fn normalize_stores(stores: &[Value], website: &str, region: &str) -> NormalizedStores {
    let mut normalized = NormalizedStores::default();

    for (index, store) in stores.iter().enumerate() {
        match normalize_store(store, website) {
            Ok(record) => normalized.records.push(record),
            Err(error) => {
                normalized.skipped += 1;
                tracing::warn!(region, index, %error, "skipping malformed store record");
            }
        }
    }

    normalized
}

/// Present string fields are kept trimmed, even when that leaves them empty.
/// Absent or non-string values yield `None`.
fn required_str(info: &Value, field: &str) -> Option<String> {
    info.get(field)
        .and_then(Value::as_str)
        .map(|v| v.trim().to_string())
}

/// Optional fields: blank after trimming counts as absent.
fn trimmed_str(info: &Value, field: &str) -> Option<String> {
    info.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Copy the upstream `id` verbatim in its JSON type. Blank strings count as
/// absent.
fn parse_store_ref(value: Option<&Value>) -> Option<StoreRef> {
    match value? {
        Value::Number(n) => Some(StoreRef::Number(n.clone())),
        Value::String(s) if !s.trim().is_empty() => Some(StoreRef::Text(s.clone())),
        _ => None,
    }
}

fn parse_coordinate(
    info: &Value,
    field: &'static str,
    store_ref: &str,
) -> Result<f64, ScraperError> {
    let invalid = |value: String| ScraperError::InvalidCoordinate {
        store_ref: store_ref.to_string(),
        field,
        value,
    };

    match info.get(field) {
        Some(Value::String(raw)) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(raw.clone())),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(n.to_string())),
        None | Some(Value::Null) => Err(ScraperError::MissingField {
            store_ref: store_ref.to_string(),
            field,
        }),
        Some(other) => Err(invalid(other.to_string())),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
