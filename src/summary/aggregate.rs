use crate::record::{ObservationRecord, RawObservation};
use crate::summary::labels::LabelMapping;
use crate::summary::types::{StationYearStats, UNMAPPED_LABEL, YearIndex};
use tracing::{debug, warn};

/// Result of folding raw rows, with the count of rows rejected as malformed.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub years: YearIndex,
    pub accepted: usize,
    pub skipped: usize,
}

/// Adds one record's counts to its site-year entry, creating the entry on
/// first sight.
pub fn add_record(years: &mut YearIndex, record: &ObservationRecord, labels: &LabelMapping) {
    let site_key = record.site_key();
    let stats = years
        .entry(record.year.clone())
        .or_default()
        .entry(site_key)
        .or_insert_with_key(|key| StationYearStats::new(key.clone()));

    let count = record.result_count;
    stats.total_measurements += count;
    stats.total_samples += record.activity_count;

    *stats
        .totals_by_characteristic
        .entry(record.characteristic_name.clone())
        .or_default() += count;
    *stats
        .totals_by_group
        .entry(record.characteristic_type.clone())
        .or_default() += count;

    let label = labels
        .resolve(&record.characteristic_type)
        .unwrap_or(UNMAPPED_LABEL);
    *stats.totals_by_label.entry(label.to_string()).or_default() += count;
}

/// Folds normalized records into a year-major index of per-site totals.
pub fn aggregate<'a, I>(records: I, labels: &LabelMapping) -> YearIndex
where
    I: IntoIterator<Item = &'a ObservationRecord>,
{
    let mut years = YearIndex::new();
    for record in records {
        add_record(&mut years, record, labels);
    }
    years
}

/// Normalizes and folds raw rows, skipping any row that fails normalization.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn aggregate_rows(rows: Vec<RawObservation>, labels: &LabelMapping) -> Aggregation {
    let mut out = Aggregation::default();

    for (index, row) in rows.into_iter().enumerate() {
        match row.normalize() {
            Ok(record) => {
                add_record(&mut out.years, &record, labels);
                out.accepted += 1;
            }
            Err(e) => {
                warn!(row = index, reason = %e, "Skipping malformed observation");
                out.skipped += 1;
            }
        }
    }

    debug!(
        accepted = out.accepted,
        skipped = out.skipped,
        years = out.years.len(),
        "Aggregation complete"
    );
    out
}
