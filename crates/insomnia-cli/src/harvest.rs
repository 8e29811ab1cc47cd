//! Store-location harvest handler for the CLI.
//!
//! Searches every selected region, streams each region's records into the
//! output sink as soon as that region completes, and prints a per-region
//! summary to stderr so stdout stays clean for the records themselves.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use futures::StreamExt;
use insomnia_core::AppConfig;
use insomnia_scraper::{LocatorClient, RegionHarvest};

use crate::output::{OutputFormat, RecordSink};

/// Running totals across every region of one harvest.
#[derive(Debug, Default, PartialEq, Eq)]
struct HarvestTally {
    regions: usize,
    failed_regions: usize,
    records: usize,
    duplicates: usize,
    skipped: usize,
}

impl HarvestTally {
    fn all_failed(&self) -> bool {
        self.regions > 0 && self.failed_regions == self.regions
    }
}

/// Harvest store locations for the regions in `states` (all regions when
/// empty) and write them to `output`, or stdout when `None`.
///
/// When `dry_run` is `true`, prints the regions that would be searched and
/// returns without sending any request.
///
/// Ctrl-C stops issuing new region requests; records already received are
/// still written before returning.
///
/// # Errors
///
/// Returns an error if a region code is unknown, the client or output cannot
/// be created, writing fails, or every searched region failed. Individual
/// region failures are reported and skipped.
pub(crate) async fn run_harvest(
    config: &AppConfig,
    states: &[String],
    output: Option<&Path>,
    format: OutputFormat,
    dry_run: bool,
) -> anyhow::Result<()> {
    let regions = insomnia_core::resolve_regions(states)?;

    if dry_run {
        println!(
            "dry-run: would search {} region(s) at {}:",
            regions.len(),
            config.endpoint_url
        );
        for region in &regions {
            println!("  {region}");
        }
        return Ok(());
    }

    let client =
        LocatorClient::from_config(config).context("failed to build store-search client")?;
    let writer = open_output(output)?;
    let mut sink = RecordSink::new(writer, format);

    eprintln!("Harvesting store locations for {} region(s)...", regions.len());

    let mut tally = HarvestTally::default();
    let mut harvests =
        std::pin::pin!(client.harvest_stream(&regions, config.max_concurrent_regions));
    let mut interrupted = false;
    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        let next = tokio::select! {
            next = harvests.next() => next,
            _ = &mut ctrl_c => {
                tracing::warn!("interrupted; writing records collected so far");
                interrupted = true;
                None
            }
        };
        let Some(harvest) = next else { break };
        record_harvest(&mut sink, &mut tally, harvest)?;
    }

    sink.finish().context("failed to write harvested records")?;

    if tally.all_failed() {
        anyhow::bail!("all {} regions failed store search", tally.failed_regions);
    }

    let interrupted_note = if interrupted { " (interrupted)" } else { "" };
    eprintln!(
        "Harvest complete{interrupted_note}: {} records from {} region(s), {} failed, \
         {} malformed stores skipped, {} duplicates dropped",
        tally.records,
        tally.regions,
        tally.failed_regions,
        tally.skipped,
        tally.duplicates,
    );
    tracing::info!(
        regions = tally.regions,
        failed_regions = tally.failed_regions,
        records = tally.records,
        skipped = tally.skipped,
        duplicates = tally.duplicates,
        interrupted,
        "harvest finished"
    );

    Ok(())
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

/// Feed one region's outcome into the sink and print its summary line.
fn record_harvest<W: Write>(
    sink: &mut RecordSink<W>,
    tally: &mut HarvestTally,
    harvest: RegionHarvest,
) -> anyhow::Result<()> {
    tally.regions += 1;
    match harvest.outcome {
        Ok(found) => {
            let mut kept = 0usize;
            for record in &found.records {
                if sink.push(record)? {
                    kept += 1;
                } else {
                    tally.duplicates += 1;
                }
            }
            tally.records += kept;
            tally.skipped += found.skipped;
            eprintln!(
                "  \u{2713} {:<4} {:>4} stores ({} skipped)",
                harvest.region, kept, found.skipped
            );
        }
        Err(error) => {
            tally.failed_regions += 1;
            eprintln!("  \u{2717} {:<4} {error}", harvest.region);
        }
    }
    Ok(())
}
