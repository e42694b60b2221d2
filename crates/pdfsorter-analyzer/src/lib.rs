//! pdfsorter Analyzer
//!
//! Turns one extracted document into a [`Judgment`](pdfsorter_domain::Judgment)
//! with a language model.
//!
//! # Overview
//!
//! The analyzer builds a single classification prompt per document, calls the
//! model through the `ModelClient` trait, and parses the answer leniently.
//! It never fails: extraction problems, exhausted retries and unusable
//! answers all become judgments that the taxonomy resolver routes to the
//! fallback folder.
//!
//! # Architecture
//!
//! ```text
//! Document → PromptBuilder → ModelClient (timeout + retry) → parser → Judgment
//! ```
//!
//! # Key Features
//!
//! - **Metadata fallback**: image-only PDFs with a title are classified from
//!   title, author and file name
//! - **Lenient parsing**: markdown fences, prose around the JSON object and
//!   free-form answers are all handled
//! - **Bounded retries**: exponential backoff on timeouts and unavailable
//!   servers, driven by an injected [`RetryPolicy`]
//!
//! # Example Usage
//!
//! ```no_run
//! use pdfsorter_analyzer::{Analyzer, AnalyzerConfig};
//! use pdfsorter_domain::{Document, ExtractedText};
//! use pdfsorter_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = MockProvider::new(r#"{"topic": "Finance", "summary": "Q3 results."}"#);
//! let analyzer = Analyzer::new(model, AnalyzerConfig::default())?;
//!
//! let document = Document::new(
//!     "/in/q3.pdf",
//!     ExtractedText { text: "Revenue grew 12%".into(), ..Default::default() },
//! );
//! let judgment = analyzer.analyze(&document).await;
//! println!("{} ({:.2})", judgment.topic(), judgment.confidence());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
mod prompt;
mod retry;

#[cfg(test)]
mod tests;

pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use parser::{parse_response, ParsedResponse, DEFAULT_CONFIDENCE, HEURISTIC_CONFIDENCE};
pub use prompt::PromptBuilder;
pub use retry::{with_retry, RetryPolicy};
