//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline error
    #[error(transparent)]
    Pipeline(#[from] pdfsorter_pipeline::PipelineError),

    /// Model server error
    #[error("Model server error: {0}")]
    Llm(#[from] pdfsorter_llm::LlmError),

    /// Output tree error
    #[error("Output error: {0}")]
    Organizer(#[from] pdfsorter_organizer::OrganizerError),

    /// Configured model is not installed on the server
    #[error("Model '{0}' is not installed. Run: ollama pull {0}")]
    ModelMissing(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
