use crate::summary::types::{SiteIndex, YearIndex};

/// Re-keys a ranked year-major index into the site-major delivery shape.
///
/// Consumes the index so every statistics entry is moved, not copied, and
/// keeps whatever percentile the ranker already wrote.
pub fn reshape(years: YearIndex) -> SiteIndex {
    let mut sites = SiteIndex::new();
    for (year, stations) in years {
        for (site_key, stats) in stations {
            sites.entry(site_key).or_default().insert(year.clone(), stats);
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::types::{PercentileBucket, StationYearStats, YearStations};

    fn stats(key: &str, total: u64) -> StationYearStats {
        StationYearStats {
            total_measurements: total,
            measurement_percentile: Some(PercentileBucket::Low),
            ..StationYearStats::new(key)
        }
    }

    #[test]
    fn test_reshape_empty() {
        assert!(reshape(YearIndex::new()).is_empty());
    }

    #[test]
    fn test_reshape_inverts_keys() {
        let mut years = YearIndex::new();
        let y2020: YearStations = [("A".to_string(), stats("A", 5)), ("B".to_string(), stats("B", 9))]
            .into_iter()
            .collect();
        let y2021: YearStations = [("A".to_string(), stats("A", 2))].into_iter().collect();
        years.insert("2020".to_string(), y2020);
        years.insert("2021".to_string(), y2021);

        let expected = years.clone();
        let sites = reshape(years);

        assert_eq!(sites.len(), 2);
        assert_eq!(sites["A"].len(), 2);
        assert_eq!(sites["B"].len(), 1);
        for (year, stations) in &expected {
            for (key, s) in stations {
                assert_eq!(&sites[key][year], s);
            }
        }
        assert_eq!(
            sites["A"]["2021"].measurement_percentile,
            Some(PercentileBucket::Low)
        );
    }
}
