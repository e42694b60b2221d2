//! Error types crossing the collaborator boundaries

use crate::judgment::FailureKind;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a text extractor
///
/// Always a per-document failure: the document is routed to the fallback
/// folder and the run continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Source file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File could not be parsed as a PDF
    #[error("Corrupted PDF: {0}")]
    Corrupted(String),

    /// File is encrypted and cannot be read without a password
    #[error("Encrypted PDF")]
    Encrypted,

    /// File parsed but contains no pages
    #[error("PDF has no pages")]
    NoPages,

    /// No page yielded any text and the file has no title to fall back on
    #[error("No extractable text (image-only or unreadable PDF)")]
    NoText,

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExtractionError {
    fn from(e: std::io::Error) -> Self {
        ExtractionError::Io(e.to_string())
    }
}

/// Errors reported by a model client
///
/// Both variants are transient and retried by the analyzer's retry policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The call exceeded its per-call budget
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    /// Server unreachable, model missing, or response unusable
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

impl ModelError {
    /// Failure kind recorded in the report when retries are exhausted
    pub fn kind(&self) -> FailureKind {
        match self {
            ModelError::Timeout(_) => FailureKind::TimeoutError,
            ModelError::Unavailable(_) => FailureKind::ModelUnavailableError,
        }
    }
}

/// Violations of data-model invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Folder name is empty, reserved, or contains unsafe characters
    #[error("Invalid folder name: {0:?}")]
    InvalidFolderName(String),

    /// Two folders differ only by case
    #[error("Duplicate folder name (case-insensitive): {0}")]
    DuplicateFolder(String),
}
