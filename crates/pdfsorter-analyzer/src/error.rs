//! Error types for the Analyzer

use thiserror::Error;

/// Errors raised while setting up an analyzer
///
/// Analysis itself never fails; per-document problems are carried in the
/// returned judgment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
