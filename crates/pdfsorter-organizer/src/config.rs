//! Configuration for the Organizer

use serde::{Deserialize, Serialize};

/// How a document reaches its folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Copy the file, leaving the source in place
    #[default]
    Copy,
    /// Move the file out of the input directory
    Move,
}

/// Naming scheme for files whose name is already taken in the target folder
///
/// `paper.pdf` becomes `paper_1.pdf`, `paper_2.pdf`, … with the default
/// separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionNaming {
    /// Text between the file stem and the counter
    pub separator: String,

    /// Maximum number of alternative names tried
    pub max_attempts: usize,
}

impl Default for CollisionNaming {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            max_attempts: 10_000,
        }
    }
}

impl CollisionNaming {
    /// Candidate name number `n`; `0` is the original name
    pub fn candidate(&self, file_name: &str, n: usize) -> String {
        if n == 0 {
            return file_name.to_string();
        }
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                format!("{}{}{}.{}", stem, self.separator, n, ext)
            }
            _ => format!("{}{}{}", file_name, self.separator, n),
        }
    }

    /// Validate the naming scheme
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("collision.max_attempts must be greater than 0".to_string());
        }
        if self
            .separator
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err("collision.separator must not contain path separators".to_string());
        }
        Ok(())
    }
}

/// Configuration for the Organizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// Copy (default) or move files
    pub placement_mode: PlacementMode,

    /// Collision naming scheme
    pub collision: CollisionNaming,
}

impl OrganizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.collision.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_names() {
        let naming = CollisionNaming::default();
        assert_eq!(naming.candidate("paper.pdf", 0), "paper.pdf");
        assert_eq!(naming.candidate("paper.pdf", 1), "paper_1.pdf");
        assert_eq!(naming.candidate("paper.v2.pdf", 3), "paper.v2_3.pdf");
        assert_eq!(naming.candidate("README", 2), "README_2");
        assert_eq!(naming.candidate(".hidden", 1), ".hidden_1");
    }

    #[test]
    fn test_custom_separator() {
        let naming = CollisionNaming {
            separator: "-".into(),
            max_attempts: 5,
        };
        assert_eq!(naming.candidate("a.pdf", 2), "a-2.pdf");
    }

    #[test]
    fn test_validate() {
        assert!(OrganizerConfig::default().validate().is_ok());

        let mut config = OrganizerConfig::default();
        config.collision.separator = "/".into();
        assert!(config.validate().is_err());

        let mut config = OrganizerConfig::default();
        config.collision.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OrganizerConfig {
            placement_mode: PlacementMode::Move,
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("placement_mode = \"move\""));
        assert_eq!(OrganizerConfig::from_toml(&toml_str).unwrap(), config);
    }
}
