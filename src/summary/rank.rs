use crate::summary::types::{PercentileBucket, YearIndex, YearStations};
use std::collections::HashMap;
use tracing::debug;

/// Converts a percentile rank (0.0–1.0) into a quartile bucket.
///
/// | Range         | Bucket |
/// |---------------|--------|
/// | < 0.25        | 0.24   |
/// | 0.25 – 0.5    | 0.49   |
/// | 0.5 – 0.75    | 0.74   |
/// | >= 0.75       | 1      |
pub fn bucket(p: f64) -> PercentileBucket {
    match p {
        p if p < 0.25 => PercentileBucket::Lowest,
        p if p < 0.5 => PercentileBucket::Low,
        p if p < 0.75 => PercentileBucket::High,
        _ => PercentileBucket::Highest,
    }
}

/// Percentile rank of `value` within ascending `sorted`: the share of
/// entries strictly smaller than it. Ties all take the position of the first
/// occurrence, so the minimum always ranks 0.
pub fn percentile_rank(sorted: &[u64], value: u64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let position = sorted.partition_point(|&v| v < value);
    position as f64 / sorted.len() as f64
}

/// Writes a percentile bucket into every site of one year.
pub fn rank_year(stations: &mut YearStations) {
    let mut totals: Vec<u64> = stations.values().map(|s| s.total_measurements).collect();
    totals.sort();

    // one bucket per distinct total, shared by every site carrying it
    let mut buckets: HashMap<u64, PercentileBucket> = HashMap::new();
    for &total in &totals {
        buckets
            .entry(total)
            .or_insert_with(|| bucket(percentile_rank(&totals, total)));
    }

    for stats in stations.values_mut() {
        stats.measurement_percentile = buckets.get(&stats.total_measurements).copied();
    }
}

/// Ranks every year of the index in place.
#[tracing::instrument(skip_all, fields(years = years.len()))]
pub fn rank_all(years: &mut YearIndex) {
    for (year, stations) in years.iter_mut() {
        rank_year(stations);
        debug!(year = %year, sites = stations.len(), "Year ranked");
    }
}
