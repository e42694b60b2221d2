//! pdfsorter Domain Layer
//!
//! This crate holds the data model shared by every stage of a sorting run and
//! the trait boundaries to the two external collaborators (text extraction and
//! the language model). It contains no I/O.
//!
//! ## Key Concepts
//!
//! - **Document**: One PDF plus the text and metadata extracted from it
//! - **Judgment**: The per-document classification (topic, summary, entities, status)
//! - **Taxonomy**: The deduplicated folder names resolved for one run
//! - **Assignment**: Exactly one folder per document, failed ones included
//! - **RunReport / IndexEntry**: The persisted view of a finished run
//!
//! ## Lifecycle
//!
//! Documents and judgments live only for the duration of one run. The taxonomy
//! and assignments are derived once per run. Only the index and report files
//! outlive the process.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod judgment;
pub mod report;
pub mod taxonomy;
pub mod traits;

// Re-exports for convenience
pub use document::{Document, ExtractedText};
pub use error::{DomainError, ExtractionError, ModelError};
pub use judgment::{FailureKind, Judgment, JudgmentStatus, ParseKind, FALLBACK_FOLDER};
pub use report::{DocumentStatus, IndexEntry, ReportEntry, RunReport};
pub use taxonomy::{Assignment, Taxonomy, TaxonomyFolder};
pub use traits::{CompletionRequest, ModelClient, TextExtractor};
