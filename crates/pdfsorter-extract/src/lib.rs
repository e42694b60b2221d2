//! pdfsorter Extract
//!
//! Text and metadata extraction from PDF files, implementing the
//! `TextExtractor` trait from `pdfsorter-domain`.
//!
//! Parsing is done with `lopdf` on a blocking thread so that a batch of
//! extractions does not stall the async runtime.
//!
//! # Example
//!
//! ```no_run
//! use pdfsorter_domain::TextExtractor;
//! use pdfsorter_extract::PdfExtractor;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = PdfExtractor::new();
//! let extracted = extractor.extract(Path::new("paper.pdf"), 50).await?;
//! println!("{} pages, title {:?}", extracted.page_count, extracted.title);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod pdf;

pub use pdf::{PdfExtractor, DEFAULT_MAX_CHARS};
