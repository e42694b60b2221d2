//! Resolver configuration

use crate::normalize::sanitize_folder_name;
use pdfsorter_domain::FALLBACK_FOLDER;
use serde::{Deserialize, Serialize};

/// Rules for turning raw topics into folders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyPolicy {
    /// Folder receiving failed, skipped and low-confidence documents
    pub fallback_folder: String,

    /// Maximum folder name length (characters)
    pub max_name_len: usize,

    /// Topics shorter than this after sanitization go to the fallback folder
    pub min_topic_len: usize,

    /// Judgments below this confidence go to the fallback folder
    pub min_confidence: f64,

    /// Minimum normalized edit-distance similarity for two topics to merge (0.0-1.0)
    pub similarity_threshold: f64,

    /// Minimum length ratio for merging when one topic contains the other (0.0-1.0)
    pub containment_ratio: f64,

    /// Placeholder topics that never become folders of their own
    pub reserved_topics: Vec<String>,
}

impl Default for TaxonomyPolicy {
    fn default() -> Self {
        Self {
            fallback_folder: FALLBACK_FOLDER.to_string(),
            max_name_len: 50,
            min_topic_len: 2,
            min_confidence: 0.3,
            similarity_threshold: 0.85,
            containment_ratio: 0.75,
            reserved_topics: ["unsorted", "uncategorized", "unknown", "misc"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl TaxonomyPolicy {
    /// Strict preset: only identical normalized topics merge
    pub fn strict() -> Self {
        Self {
            similarity_threshold: 1.0,
            containment_ratio: 1.0,
            min_confidence: 0.5,
            ..Self::default()
        }
    }

    /// Lenient preset: merge more aggressively, trust low-confidence answers
    pub fn lenient() -> Self {
        Self {
            similarity_threshold: 0.75,
            containment_ratio: 0.5,
            min_confidence: 0.0,
            ..Self::default()
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_name_len < 2 {
            return Err("max_name_len must be at least 2".to_string());
        }
        if self.min_topic_len == 0 {
            return Err("min_topic_len must be greater than 0".to_string());
        }
        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("similarity_threshold", self.similarity_threshold),
            ("containment_ratio", self.containment_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0.0 and 1.0, got {}", name, value));
            }
        }
        let fallback = sanitize_folder_name(&self.fallback_folder, self.max_name_len);
        if fallback.is_empty() || fallback != self.fallback_folder {
            return Err(format!(
                "fallback_folder {:?} is not a valid folder name",
                self.fallback_folder
            ));
        }
        Ok(())
    }

    /// Load policy from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize policy to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(TaxonomyPolicy::default().validate().is_ok());
        assert!(TaxonomyPolicy::strict().validate().is_ok());
        assert!(TaxonomyPolicy::lenient().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let policy = TaxonomyPolicy::default();
        assert_eq!(policy.fallback_folder, "Unsorted");
        assert_eq!(policy.similarity_threshold, 0.85);
        assert_eq!(policy.containment_ratio, 0.75);
        assert!(policy.reserved_topics.contains(&"misc".to_string()));
    }

    #[test]
    fn test_invalid_fallback_folder() {
        let mut policy = TaxonomyPolicy::default();
        policy.fallback_folder = "Not/Safe".into();
        assert!(policy.validate().is_err());

        policy.fallback_folder = String::new();
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut policy = TaxonomyPolicy::default();
        policy.similarity_threshold = 1.2;
        assert!(policy.validate().is_err());

        let mut policy = TaxonomyPolicy::default();
        policy.min_confidence = -0.1;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let policy = TaxonomyPolicy::lenient();
        let parsed = TaxonomyPolicy::from_toml(&policy.to_toml().unwrap()).unwrap();
        assert_eq!(policy, parsed);
    }
}
