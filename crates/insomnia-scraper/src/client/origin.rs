//! Origin and domain helpers for the store-search client.

/// Scheme+host origin of `url`, e.g. `https://insomniacookies.com`.
pub(super) fn endpoint_origin(url: &reqwest::Url) -> String {
    url.origin().ascii_serialization()
}

/// Referer sent with every search: the public locations page on the same
/// origin as the endpoint.
pub(super) fn locations_referer(origin: &str) -> String {
    format!("{}/locations", origin.trim_end_matches('/'))
}

/// Hostname of `url` for use in error messages.
pub(super) fn extract_domain(url: &reqwest::Url) -> String {
    url.host_str()
        .map_or_else(|| url.to_string(), str::to_owned)
}
