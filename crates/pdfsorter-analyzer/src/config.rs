//! Configuration for the Analyzer

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Model identifier passed to the model client
    pub model: String,

    /// Sampling temperature in `[0.0, 1.0]`
    pub temperature: f64,

    /// Maximum number of entities kept per document
    pub max_entities: usize,

    /// Summary length budget (words)
    pub summary_words: usize,

    /// Maximum document text included in the prompt (characters)
    pub max_prompt_chars: usize,

    /// Maximum time for a single model call (seconds)
    pub call_timeout_secs: u64,

    /// Retry policy for timeouts and unavailable servers
    pub retry: RetryPolicy,
}

/// Hard cap on summary length, whatever the word budget
pub const MAX_SUMMARY_CHARS: usize = 1_000;

impl AnalyzerConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            ));
        }
        if self.max_entities == 0 {
            return Err("max_entities must be greater than 0".to_string());
        }
        if self.summary_words == 0 {
            return Err("summary_words must be greater than 0".to_string());
        }
        if self.max_prompt_chars == 0 {
            return Err("max_prompt_chars must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        self.retry.validate()
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

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            temperature: 0.3,
            max_entities: 5,
            summary_words: 60,
            max_prompt_chars: 8_000,
            call_timeout_secs: 120,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.call_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = AnalyzerConfig::default();
        config.temperature = 1.5;
        assert!(config.validate().is_err());

        config.temperature = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_budgets() {
        let mut config = AnalyzerConfig::default();
        config.max_entities = 0;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.model = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_retry_policy_is_reported() {
        let mut config = AnalyzerConfig::default();
        config.retry.max_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_attempts"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyzerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = AnalyzerConfig::from_toml("model = \"mistral\"\n[retry]\nmax_attempts = 5\n").unwrap();
        assert_eq!(parsed.model, "mistral");
        assert_eq!(parsed.retry.max_attempts, 5);
        assert_eq!(parsed.retry.initial_backoff_ms, 1_000);
        assert_eq!(parsed.max_entities, 5);
    }
}
