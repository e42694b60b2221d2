//! Configuration management for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! variables (a `.env` file is loaded first), command-line flags.

use crate::cli::{PresetArg, RunArgs};
use crate::error::{CliError, Result};
use pdfsorter_organizer::PlacementMode;
use pdfsorter_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display settings
    pub settings: Settings,

    /// Pipeline settings
    pub pipeline: PipelineConfig,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pdfsorter").join("config.toml"))
    }

    /// Resolve the configuration file path.
    pub fn path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a file.
    ///
    /// A missing file yields the defaults unless it was named explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !path.exists() {
            if explicit {
                return Err(CliError::Config(format!(
                    "Configuration file {} not found",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Load `.env` and apply the process environment.
    pub fn apply_process_env(&mut self) -> Result<()> {
        dotenv::dotenv().ok();
        self.apply_env(|key| dotenv::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pipeline = &mut self.pipeline;

        if let Some(value) = lookup("PDF_INPUT_DIR") {
            pipeline.input_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("PDF_OUTPUT_DIR") {
            pipeline.output_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("MAX_PAGES_PER_PDF") {
            pipeline.max_pages = parse_env("MAX_PAGES_PER_PDF", &value)?;
        }
        if let Some(value) = lookup("LLM_MODEL") {
            pipeline.analyzer.model = value;
        }
        if let Some(value) = lookup("LLM_BASE_URL") {
            pipeline.base_url = value;
        }
        if let Some(value) = lookup("LLM_TEMPERATURE") {
            pipeline.analyzer.temperature = parse_env("LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = lookup("BATCH_SIZE") {
            pipeline.batch_size = parse_env("BATCH_SIZE", &value)?;
        }
        if let Some(value) = lookup("LOG_LEVEL") {
            pipeline.log_level = value.to_lowercase();
        }
        if let Some(value) = lookup("GENERATE_INDEX") {
            pipeline.generate_index = value.trim().eq_ignore_ascii_case("true");
        }
        Ok(())
    }

    /// Apply command-line flags of the run command.
    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if let Some(preset) = args.preset {
            let tuned = match preset {
                PresetArg::Conservative => PipelineConfig::conservative(),
                PresetArg::Fast => PipelineConfig::fast(),
            };
            // Presets tune throughput only
            let pipeline = &mut self.pipeline;
            pipeline.batch_size = tuned.batch_size;
            pipeline.max_pages = tuned.max_pages;
            pipeline.analyzer.call_timeout_secs = tuned.analyzer.call_timeout_secs;
            pipeline.analyzer.max_prompt_chars = tuned.analyzer.max_prompt_chars;
            pipeline.analyzer.retry = tuned.analyzer.retry;
        }

        let pipeline = &mut self.pipeline;
        if let Some(input) = &args.input {
            pipeline.input_dir = input.clone();
        }
        if let Some(output) = &args.output {
            pipeline.output_dir = output.clone();
        }
        if let Some(model) = &args.model {
            pipeline.analyzer.model = model.clone();
        }
        if let Some(base_url) = &args.base_url {
            pipeline.base_url = base_url.clone();
        }
        if let Some(batch_size) = args.batch_size {
            pipeline.batch_size = batch_size;
        }
        if let Some(max_pages) = args.max_pages {
            pipeline.max_pages = max_pages;
        }
        if args.move_files {
            pipeline.organizer.placement_mode = PlacementMode::Move;
        }
        if args.skip_indexed {
            pipeline.skip_indexed = true;
        }
        if args.no_index {
            pipeline.generate_index = false;
        }
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CliError::Config(format!("{}={:?}: {}", key, value, e)))
}
