//! CSV parser for period-of-record summary files.

use anyhow::{Context, Result};
use tracing::debug;

use crate::record::RawObservation;

/// Decodes period-of-record rows from raw CSV bytes.
///
/// Columns are matched by header name and unknown columns are ignored.
///
/// # Errors
///
/// Returns an error if the CSV is structurally invalid, e.g. a row with a
/// different number of fields than the header.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawObservation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: RawObservation = result.with_context(|| format!("decoding CSV row {index}"))?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "CSV parsed");
    Ok(rows)
}
