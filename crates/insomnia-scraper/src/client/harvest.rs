//! Per-region harvest loops for `LocatorClient`.

use futures::stream::{self, Stream, StreamExt};
use insomnia_core::PoiRecord;

use crate::error::ScraperError;
use crate::normalize::normalize_stores;

use super::LocatorClient;

/// Records produced by one successful region search.
#[derive(Debug, Default)]
pub struct RegionRecords {
    /// URL of the search response; every record's `website`.
    pub website: String,
    pub records: Vec<PoiRecord>,
    /// Store entries dropped by validation.
    pub skipped: usize,
}

/// Outcome of harvesting a single region code.
///
/// A failed region carries its error here instead of aborting the run.
#[derive(Debug)]
pub struct RegionHarvest {
    pub region: String,
    pub outcome: Result<RegionRecords, ScraperError>,
}

impl LocatorClient {
    /// Searches one region and maps its stores into output records.
    ///
    /// Never fails: transport and decode errors are logged and returned
    /// inside [`RegionHarvest::outcome`]. An empty or absent `stores` list
    /// yields zero records.
    pub async fn harvest_region(&self, region: &str) -> RegionHarvest {
        let outcome = match self.search_stores(region).await {
            Ok(response) => {
                let entries = response.body.store_entries();
                let normalized = normalize_stores(entries, &response.website, region);
                tracing::info!(
                    region,
                    stores = entries.len(),
                    records = normalized.records.len(),
                    skipped = normalized.skipped,
                    "region harvested"
                );
                Ok(RegionRecords {
                    website: response.website,
                    records: normalized.records,
                    skipped: normalized.skipped,
                })
            }
            Err(error) => {
                tracing::error!(region, %error, "store search failed");
                Err(error)
            }
        };

        RegionHarvest {
            region: region.to_owned(),
            outcome,
        }
    }

    /// Harvests every region in `regions`, at most `max_concurrent` at a
    /// time, yielding each region's outcome as soon as it completes.
    ///
    /// Completion order is unspecified. Dropping the stream stops issuing
    /// further requests.
    pub fn harvest_stream<'a>(
        &'a self,
        regions: &'a [&'a str],
        max_concurrent: usize,
    ) -> impl Stream<Item = RegionHarvest> + 'a {
        stream::iter(regions)
            .map(move |region| self.harvest_region(region))
            .buffer_unordered(max_concurrent.max(1))
    }

    /// Harvests every region in `regions` and collects all outcomes.
    pub async fn harvest_regions(
        &self,
        regions: &[&str],
        max_concurrent: usize,
    ) -> Vec<RegionHarvest> {
        self.harvest_stream(regions, max_concurrent)
            .collect()
            .await
    }
}
