//! Data types produced by the summary pipeline.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Label key used for characteristic types no mapping entry covers.
pub const UNMAPPED_LABEL: &str = "undefined";

/// Coarse quartile membership of a site's measurement count within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PercentileBucket {
    /// Bottom quartile, reported as `0.24`.
    Lowest,
    /// Second quartile, reported as `0.49`.
    Low,
    /// Third quartile, reported as `0.74`.
    High,
    /// Top quartile, reported as `1`.
    Highest,
}

impl PercentileBucket {
    pub fn value(self) -> f64 {
        match self {
            PercentileBucket::Lowest => 0.24,
            PercentileBucket::Low => 0.49,
            PercentileBucket::High => 0.74,
            PercentileBucket::Highest => 1.0,
        }
    }
}

impl Serialize for PercentileBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PercentileBucket::Highest => serializer.serialize_u8(1),
            other => serializer.serialize_f64(other.value()),
        }
    }
}

/// Totals for one site in one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationYearStats {
    pub unique_id: String,
    pub total_measurements: u64,
    pub total_samples: u64,
    pub totals_by_characteristic: BTreeMap<String, u64>,
    pub totals_by_group: BTreeMap<String, u64>,
    pub totals_by_label: BTreeMap<String, u64>,
    pub measurement_percentile: Option<PercentileBucket>,
}

impl StationYearStats {
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            ..Default::default()
        }
    }
}

/// SiteKey → statistics for a single year.
pub type YearStations = BTreeMap<String, StationYearStats>;

/// year → SiteKey → statistics. Native shape of aggregation and ranking.
pub type YearIndex = BTreeMap<String, YearStations>;

/// SiteKey → year → statistics. Delivered shape.
pub type SiteIndex = BTreeMap<String, BTreeMap<String, StationYearStats>>;
