//! pdfsorter Pipeline
//!
//! Orchestrates one sorting run over a directory of PDF files.
//!
//! # Overview
//!
//! A run proceeds in four stages:
//! - **Discovery**: `*.pdf` files directly inside the input directory, sorted
//! - **Analysis**: extraction and classification in groups of `batch_size`
//!   documents; at most `batch_size` model calls are in flight at once
//! - **Resolution**: the whole batch of judgments becomes one taxonomy
//! - **Organization**: files are placed sequentially, then `index.json` and
//!   `report.json` are written
//!
//! A failure in one document never aborts the run. [`Pipeline::run`] returns
//! an error only when the run cannot start (configuration, input or output
//! directory) or when its artifacts cannot be written.
//!
//! # Cancellation
//!
//! Runs take a [`CancellationToken`](tokio_util::sync::CancellationToken).
//! It is checked between groups: model calls already in flight complete,
//! documents not yet reached are reported as `Skipped` and the report is
//! flagged `cancelled`.
//!
//! # Reruns
//!
//! With `skip_indexed`, documents a previous `index.json` lists as `Success`
//! are neither extracted nor analyzed again. Their index entries are carried
//! forward unchanged.
//!
//! # Configuration
//!
//! ```toml
//! input_dir = "data/sample_pdfs"
//! output_dir = "data/output"
//! max_pages = 50
//! batch_size = 5
//! log_level = "info"
//! generate_index = true
//! skip_indexed = false
//! base_url = "http://localhost:11434"
//!
//! [analyzer]
//! model = "llama3.2"
//! temperature = 0.3
//!
//! [taxonomy]
//! similarity_threshold = 0.85
//!
//! [organizer]
//! placement_mode = "copy"
//! ```

#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod pipeline;
mod progress;

pub use config::{PipelineConfig, LOG_LEVELS};
pub use discovery::discover_pdfs;
pub use error::PipelineError;
pub use pipeline::{Pipeline, SKIP_ALREADY_INDEXED, SKIP_CANCELLED};
pub use progress::{NoopObserver, ProgressObserver};
