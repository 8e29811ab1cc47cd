pub mod client;
pub mod error;
pub mod hours;
pub mod normalize;
pub mod rate_limit;
pub mod types;

pub use client::{LocatorClient, RegionHarvest, RegionRecords};
pub use error::ScraperError;
pub use hours::{normalize_time_string, parse_store_hours, OpeningHours};
pub use normalize::{map_store, normalize_store, normalize_stores, validate_store, ValidatedStore};
