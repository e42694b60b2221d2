//! Organizer error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing to the output tree
#[derive(Error, Debug)]
pub enum OrganizerError {
    /// Filesystem operation failed
    #[error("I/O error on {}: {message}", .path.display())]
    Io {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// Folder name cannot be used as a path component
    #[error("Invalid folder name: {0:?}")]
    InvalidFolder(String),

    /// Every candidate file name was already taken
    #[error("No free name for {file_name} after {attempts} attempts")]
    CollisionLimit {
        /// Original file name
        file_name: String,
        /// Number of names tried
        attempts: usize,
    },

    /// JSON serialization or parsing error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrganizerError {
    /// Build an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        OrganizerError::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for OrganizerError {
    fn from(e: serde_json::Error) -> Self {
        OrganizerError::Serialization(e.to_string())
    }
}
