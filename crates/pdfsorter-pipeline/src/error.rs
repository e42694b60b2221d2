//! Error types for pipeline runs

use pdfsorter_organizer::OrganizerError;
use pdfsorter_taxonomy::TaxonomyError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run as a whole
///
/// Per-document problems never surface here; they are recorded in the
/// report instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration, detected before any document is processed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input directory missing or unreadable
    #[error("Cannot read input directory {}: {message}", .path.display())]
    InputDirectory {
        /// Configured input directory
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// Output directory could not be created
    #[error("Cannot create output directory: {0}")]
    OutputDirectory(#[source] OrganizerError),

    /// Taxonomy could not be built
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    /// `index.json` or `report.json` could not be written
    #[error("Cannot write run artifacts: {0}")]
    Artifact(#[source] OrganizerError),
}
