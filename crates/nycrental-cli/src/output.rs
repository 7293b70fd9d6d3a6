//! CSV sink for a run's classification records.

use std::path::Path;

use serde::Serialize;

use nycrental_core::{ClassificationRecord, RecordStatus};

pub(crate) const RESULTS_FILE: &str = "results.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV row. Field order is the column order.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    address: &'a str,
    search_url: &'a str,
    final_url: Option<&'a str>,
    unit_name: Option<&'a str>,
    unit_address: Option<&'a str>,
    has_listing: Option<bool>,
    same_address: Option<bool>,
    status: RecordStatus,
    processed_at: String,
}

impl<'a> From<&'a ClassificationRecord> for CsvRow<'a> {
    fn from(record: &'a ClassificationRecord) -> Self {
        Self {
            address: &record.address,
            search_url: &record.search_url,
            final_url: record.final_url.as_deref(),
            unit_name: record.unit_name.as_deref(),
            unit_address: record.unit_address.as_deref(),
            has_listing: record.has_listing,
            same_address: record.same_address,
            status: record.status,
            processed_at: record.processed_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Writes `records` to `path` with a header row, replacing any existing file.
///
/// The header is written even when `records` is empty.
pub(crate) fn write_records(path: &Path, records: &[ClassificationRecord]) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record([
        "address",
        "search_url",
        "final_url",
        "unit_name",
        "unit_address",
        "has_listing",
        "same_address",
        "status",
        "processed_at",
    ])?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
