//! Period-of-record summary pipeline.
//!
//! Raw observation rows are folded into per-site, per-year totals
//! ([`aggregate`]), each year's sites are bucketed by measurement count
//! ([`rank`]), and the result is re-keyed site-first for delivery
//! ([`reshape`]).

pub mod aggregate;
pub mod labels;
pub mod rank;
pub mod reshape;
pub mod types;

pub use labels::{LabelEntry, LabelMapping};
pub use types::{PercentileBucket, SiteIndex, StationYearStats, YearIndex};
