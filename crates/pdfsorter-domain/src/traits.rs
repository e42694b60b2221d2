//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the sorting pipeline and
//! infrastructure. Implementations live in other crates (pdfsorter-extract,
//! pdfsorter-llm) or in tests.

use crate::document::ExtractedText;
use crate::error::{ExtractionError, ModelError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Extracts text and metadata from a file
///
/// Implemented by the infrastructure layer (pdfsorter-extract)
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from at most `max_pages` pages plus basic metadata
    async fn extract(&self, path: &Path, max_pages: usize) -> Result<ExtractedText, ExtractionError>;
}

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt text
    pub prompt: String,

    /// Model identifier (e.g. "llama3.2")
    pub model: String,

    /// Sampling temperature in `[0.0, 1.0]`, passed through unchanged
    pub temperature: f64,

    /// Budget for this one call
    pub timeout: Duration,
}

/// Text completion against a language model
///
/// Implemented by the infrastructure layer (pdfsorter-llm)
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Return the completion text for a request
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;
}
