//! Observation rows as they arrive from the period-of-record CSV.
//!
//! [`RawObservation`] mirrors a CSV row with every field optional;
//! [`ObservationRecord`] is the normalized form the aggregator consumes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between the components of a [`site_key`].
pub const SITE_KEY_SEPARATOR: &str = "-";

/// Why a raw row could not be turned into an [`ObservationRecord`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("field {field} is not a non-negative integer count")]
    InvalidCount { field: &'static str },
}

/// A single row deserialized from the period-of-record summary CSV.
///
/// Empty cells become `None`. Count cells that do not parse as an unsigned
/// integer also become `None` so that one bad row never fails the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "MonitoringLocationIdentifier", default)]
    pub monitoring_location: Option<String>,
    #[serde(rename = "Provider", default)]
    pub provider: Option<String>,
    #[serde(rename = "OrganizationIdentifier", default)]
    pub organization: Option<String>,
    #[serde(rename = "YearSummarized", default)]
    pub year: Option<String>,
    #[serde(
        rename = "ResultCount",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub result_count: Option<u64>,
    #[serde(
        rename = "ActivityCount",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub activity_count: Option<u64>,
    #[serde(rename = "CharacteristicName", default)]
    pub characteristic_name: Option<String>,
    #[serde(rename = "CharacteristicType", default)]
    pub characteristic_type: Option<String>,
}

/// A fully populated observation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationRecord {
    pub monitoring_location: String,
    pub provider: String,
    pub organization: String,
    /// Opaque grouping key; not validated as a number.
    pub year: String,
    pub result_count: u64,
    pub activity_count: u64,
    pub characteristic_name: String,
    pub characteristic_type: String,
}

impl ObservationRecord {
    pub fn site_key(&self) -> String {
        site_key(&self.monitoring_location, &self.provider, &self.organization)
    }
}

/// Builds the composite identity of a monitoring site.
pub fn site_key(monitoring_location: &str, provider: &str, organization: &str) -> String {
    [monitoring_location, provider, organization].join(SITE_KEY_SEPARATOR)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RecordError::MissingField { field }),
    }
}

impl RawObservation {
    /// Applies the required-field rules.
    ///
    /// A missing year is kept as the empty grouping key.
    pub fn normalize(self) -> Result<ObservationRecord, RecordError> {
        Ok(ObservationRecord {
            monitoring_location: required(self.monitoring_location, "MonitoringLocationIdentifier")?,
            provider: required(self.provider, "Provider")?,
            organization: required(self.organization, "OrganizationIdentifier")?,
            year: self.year.unwrap_or_default(),
            result_count: self.result_count.ok_or(RecordError::InvalidCount {
                field: "ResultCount",
            })?,
            activity_count: self.activity_count.ok_or(RecordError::InvalidCount {
                field: "ActivityCount",
            })?,
            characteristic_name: required(self.characteristic_name, "CharacteristicName")?,
            characteristic_type: required(self.characteristic_type, "CharacteristicType")?,
        })
    }
}

impl TryFrom<RawObservation> for ObservationRecord {
    type Error = RecordError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}
