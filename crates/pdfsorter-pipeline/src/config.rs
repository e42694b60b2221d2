//! Configuration for a sorting run
//!
//! One immutable value carries everything a run needs; each component
//! receives its own section.

use pdfsorter_analyzer::{AnalyzerConfig, RetryPolicy};
use pdfsorter_organizer::OrganizerConfig;
use pdfsorter_taxonomy::TaxonomyPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log levels accepted by `log_level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for one pipeline run
///
/// # Examples
///
/// ```
/// use pdfsorter_pipeline::PipelineConfig;
///
/// // Defaults: batches of 5, first 50 pages, index enabled
/// let config = PipelineConfig::default();
/// assert_eq!(config.batch_size, 5);
///
/// // One document at a time, patient with slow models
/// let config = PipelineConfig::conservative();
/// assert_eq!(config.batch_size, 1);
///
/// // Wider batches, fewer pages, fail fast
/// let config = PipelineConfig::fast();
/// assert_eq!(config.batch_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory scanned for `*.pdf` files (not recursive)
    pub input_dir: PathBuf,

    /// Root of the organized output tree
    pub output_dir: PathBuf,

    /// Pages read per document; 0 reads every page
    pub max_pages: usize,

    /// Documents analyzed concurrently
    pub batch_size: usize,

    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,

    /// Write `index.json` at the output root
    pub generate_index: bool,

    /// Skip documents a previous `index.json` lists as sorted
    pub skip_indexed: bool,

    /// Model server base URL
    pub base_url: String,

    /// Document analysis
    pub analyzer: AnalyzerConfig,

    /// Folder resolution
    pub taxonomy: TaxonomyPolicy,

    /// File placement
    pub organizer: OrganizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/sample_pdfs"),
            output_dir: PathBuf::from("data/output"),
            max_pages: 50,
            batch_size: 5,
            log_level: "info".to_string(),
            generate_index: true,
            skip_indexed: false,
            base_url: "http://localhost:11434".to_string(),
            analyzer: AnalyzerConfig::default(),
            taxonomy: TaxonomyPolicy::default(),
            organizer: OrganizerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Conservative preset: one document at a time, long timeouts, more retries
    ///
    /// Suited to small machines running large models.
    pub fn conservative() -> Self {
        let mut config = Self::default();
        config.batch_size = 1;
        config.analyzer.call_timeout_secs = 300;
        config.analyzer.retry = RetryPolicy {
            max_attempts: 5,
            ..RetryPolicy::default()
        };
        config
    }

    /// Fast preset: wide batches, fewer pages, short timeouts
    pub fn fast() -> Self {
        let mut config = Self::default();
        config.batch_size = 10;
        config.max_pages = 10;
        config.analyzer.call_timeout_secs = 60;
        config.analyzer.max_prompt_chars = 4_000;
        config.analyzer.retry = RetryPolicy {
            max_attempts: 2,
            initial_backoff_ms: 500,
            ..RetryPolicy::default()
        };
        config
    }

    /// Validate the configuration and every section
    pub fn validate(&self) -> Result<(), String> {
        if self.input_dir.as_os_str().is_empty() {
            return Err("input_dir must not be empty".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("output_dir must not be empty".to_string());
        }
        if same_directory(&self.input_dir, &self.output_dir) {
            return Err("output_dir must differ from input_dir".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        self.analyzer
            .validate()
            .map_err(|e| format!("analyzer: {}", e))?;
        self.taxonomy
            .validate()
            .map_err(|e| format!("taxonomy: {}", e))?;
        self.organizer
            .validate()
            .map_err(|e| format!("organizer: {}", e))
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

/// Compare resolved paths when both exist, spelled paths otherwise
fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
