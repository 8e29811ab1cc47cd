//! Output sink for harvested store records.
//!
//! GeoJSON output is buffered and written as a single `FeatureCollection`
//! when the run finishes; JSON-lines output is streamed one record per line
//! as regions complete.

use std::collections::HashSet;
use std::io::Write;

use clap::ValueEnum;
use insomnia_core::{PoiRecord, StoreRef};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// A GeoJSON `FeatureCollection` of `Point` features.
    Geojson,
    /// One flat JSON record per line.
    Jsonl,
}

/// Writes records in the selected format, dropping repeats of a store `ref`
/// already written in this run.
///
/// Refs compare by JSON type as well as value: a numeric `1` and a text
/// `"1"` count as different stores.
pub(crate) struct RecordSink<W: Write> {
    writer: W,
    format: OutputFormat,
    seen: HashSet<StoreRef>,
    features: Vec<Value>,
    written: usize,
}

impl<W: Write> RecordSink<W> {
    pub(crate) fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            seen: HashSet::new(),
            features: Vec::new(),
            written: 0,
        }
    }

    /// Queue or write one record. Returns `false` when the record's `ref`
    /// was already emitted and the record was dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub(crate) fn push(&mut self, record: &PoiRecord) -> anyhow::Result<bool> {
        if !self.seen.insert(record.store_ref.clone()) {
            tracing::debug!(store_ref = %record.store_ref, "dropping duplicate store record");
            return Ok(false);
        }

        match self.format {
            OutputFormat::Geojson => self.features.push(to_feature(record)?),
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut self.writer, record)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.written += 1;
        Ok(true)
    }

    /// Flush everything still buffered and return the number of records
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the final write or flush fails.
    pub(crate) fn finish(mut self) -> anyhow::Result<usize> {
        if self.format == OutputFormat::Geojson {
            let collection = json!({
                "type": "FeatureCollection",
                "features": self.features,
            });
            serde_json::to_writer(&mut self.writer, &collection)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(self.written)
    }
}

/// Convert a record into a GeoJSON `Point` feature.
///
/// Coordinates move into the geometry as `[lon, lat]`; every other field is
/// kept as a property, with absent optional fields left out.
pub(crate) fn to_feature(record: &PoiRecord) -> serde_json::Result<Value> {
    let mut properties = serde_json::to_value(record)?;
    if let Some(map) = properties.as_object_mut() {
        map.remove("lat");
        map.remove("lon");
    }

    Ok(json!({
        "type": "Feature",
        "id": record.store_ref,
        "geometry": {
            "type": "Point",
            "coordinates": [record.lon, record.lat],
        },
        "properties": properties,
    }))
}
