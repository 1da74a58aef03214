use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One row of the label mapping: a display label and the characteristic
/// types it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelEntry {
    pub label: String,
    pub group_names: Vec<String>,
}

/// Translates characteristic types into human-readable labels.
///
/// Stored as a JSON array on disk:
/// ```json
/// [
///   { "label": "Physical", "groupNames": ["Physical"] },
///   { "label": "Nutrients", "groupNames": ["Nutrient", "Inorganics, Major, Non-metals"] }
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMapping {
    entries: Vec<LabelEntry>,
}

impl LabelMapping {
    /// Loads the mapping from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading label mapping {path}"))?;
        let mapping: LabelMapping = serde_json::from_str(&content)
            .with_context(|| format!("parsing label mapping {path}"))?;
        Ok(mapping)
    }

    pub fn from_entries(entries: Vec<LabelEntry>) -> Self {
        Self { entries }
    }

    /// Returns the label of the first entry whose group names contain
    /// `characteristic_type`.
    pub fn resolve(&self, characteristic_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.group_names.iter().any(|g| g == characteristic_type))
            .map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, groups: &[&str]) -> LabelEntry {
        LabelEntry {
            label: label.to_string(),
            group_names: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let mapping = LabelMapping::from_entries(vec![
            entry("Nutrients", &["Nutrient"]),
            entry("Everything", &["Nutrient", "Physical"]),
        ]);

        assert_eq!(mapping.resolve("Nutrient"), Some("Nutrients"));
        assert_eq!(mapping.resolve("Physical"), Some("Everything"));
    }

    #[test]
    fn test_resolve_miss() {
        let mapping = LabelMapping::from_entries(vec![entry("Physical", &["Physical"])]);
        assert_eq!(mapping.resolve("Microbiological"), None);
        assert_eq!(LabelMapping::default().resolve("Physical"), None);
    }

    #[test]
    fn test_deserialize_camel_case_array() {
        let json = r#"[{"label":"Metals","groupNames":["Inorganics, Minor, Metals"]}]"#;
        let mapping: LabelMapping = serde_json::from_str(json).unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.resolve("Inorganics, Minor, Metals"), Some("Metals"));
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(LabelMapping::load("/nonexistent/por_summary_labels.json").is_err());
    }
}
