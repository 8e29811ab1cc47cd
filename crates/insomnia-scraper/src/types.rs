//! Response types for the store-search endpoint.
//!
//! ## Observed shape
//!
//! ```json
//! {"stores": [{"store_info": {"id": 118, "name": "Union Square", "address": "50 E 13th St",
//!   "city": "New York", "state": "NY", "zip": "10003", "phone": "(212) 555-0100",
//!   "store_lat": "40.7340", "store_lon": "-73.9910",
//!   "store_open": "10:00 AM", "store_close": "3:00:00 AM"}}]}
//! ```
//!
//! ### `stores`
//! An array of store objects when the region has locations. Regions without
//! stores have been seen to return an empty array, `null`, or `false`, so the
//! field is kept as a raw [`serde_json::Value`] and anything that is not an
//! array is read as "no stores".
//!
//! ### Store entries
//! Entries are kept as raw JSON and validated one at a time by
//! [`crate::normalize::validate_store`], so one malformed store does not
//! fail the whole region.

use serde::Deserialize;

/// Top-level response from `POST /locations/searchStores`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchStoresResponse {
    #[serde(default)]
    pub stores: serde_json::Value,
}

impl SearchStoresResponse {
    /// Raw store entries; empty when `stores` is missing or not an array.
    #[must_use]
    pub fn store_entries(&self) -> &[serde_json::Value] {
        match &self.stores {
            serde_json::Value::Array(entries) => entries.as_slice(),
            _ => &[],
        }
    }
}

/// One region's decoded search response together with the URL it came from.
#[derive(Debug)]
pub struct RegionResponse {
    pub region: String,
    /// Final URL of the response, used as each record's `website`.
    pub website: String,
    pub body: SearchStoresResponse,
}
