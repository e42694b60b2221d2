//! Taxonomy error types

use pdfsorter_domain::DomainError;
use thiserror::Error;

/// Errors that can occur while resolving a taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaxonomyError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resolved folders violate a taxonomy invariant
    #[error(transparent)]
    Domain(#[from] DomainError),
}
