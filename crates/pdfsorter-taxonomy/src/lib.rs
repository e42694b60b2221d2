//! pdfsorter Taxonomy
//!
//! Resolves the raw topics of one run into a stable, deduplicated set of
//! folder names and assigns every document to exactly one of them.
//!
//! The resolver provides:
//! - Folder-name sanitization (filesystem-safe, length-capped, case preserved)
//! - Merging of near-identical topics (edit distance and containment)
//! - Canonical naming (most frequent raw topic of a group)
//! - Routing of failed, skipped and low-confidence documents to the fallback folder
//!
//! Resolution is pure and deterministic: the same ordered judgments always
//! produce the same taxonomy and assignments.
//!
//! # Examples
//!
//! ```
//! use pdfsorter_domain::{Judgment, ParseKind};
//! use pdfsorter_taxonomy::{TaxonomyPolicy, TaxonomyResolver};
//!
//! let judgments = vec![
//!     Judgment::success("/in/a.pdf", "Machine Learning", "", vec![], 0.9, ParseKind::Structured),
//!     Judgment::success("/in/b.pdf", "machine-learning", "", vec![], 0.8, ParseKind::Structured),
//!     Judgment::extraction_failed("/in/c.pdf", "corrupted"),
//! ];
//!
//! let resolver = TaxonomyResolver::new(TaxonomyPolicy::default()).unwrap();
//! let resolution = resolver.resolve(&judgments).unwrap();
//!
//! let names: Vec<_> = resolution.taxonomy.folder_names().collect();
//! assert_eq!(names, vec!["Machine_Learning", "Unsorted"]);
//! ```

#![warn(missing_docs)]

mod error;
mod normalize;
mod policy;
mod resolver;
mod similarity;

pub use error::TaxonomyError;
pub use normalize::{normalize_topic, sanitize_folder_name};
pub use policy::TaxonomyPolicy;
pub use resolver::{Resolution, TaxonomyResolver};
pub use similarity::{levenshtein, similarity};
