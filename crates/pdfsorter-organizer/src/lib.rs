//! pdfsorter Organizer
//!
//! Materializes a resolved taxonomy on disk: one folder per taxonomy entry,
//! each document placed in its assigned folder, then `index.json` and
//! `report.json` written at the output root.
//!
//! # Overview
//!
//! - **Output tree**: [`OutputTree`] is the only code path that mutates the
//!   output directory. [`FsOutputTree`] implements it on the local filesystem.
//! - **Placement**: copy (default) or move; an existing file is never
//!   overwritten, colliding names get a numeric suffix (`paper_1.pdf`).
//! - **Fail-soft**: a placement failure marks that document `MoveFailed` and
//!   the remaining documents are still placed.
//! - **Artifacts**: the index and report are written to a temporary file and
//!   renamed over the previous version, so readers never see partial JSON.
//!
//! # Usage
//!
//! ```no_run
//! use pdfsorter_domain::{Judgment, ParseKind};
//! use pdfsorter_organizer::{
//!     write_index, FsOutputTree, Organizer, OrganizerConfig, OutputTree, PlacementRequest,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let judgment = Judgment::success("in/q3.pdf", "Finance", "", vec![], 0.9, ParseKind::Structured);
//! let tree = FsOutputTree::new("out");
//! tree.ensure_root()?;
//!
//! let organizer = Organizer::new(tree, OrganizerConfig::default())?;
//! let placements = organizer.organize(&[PlacementRequest { judgment: &judgment, folder: "Finance" }]);
//!
//! let index: Vec<_> = placements.iter().map(|p| p.index_entry()).collect();
//! write_index(organizer.tree(), &index)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [organizer]
//! placement_mode = "copy"
//!
//! [organizer.collision]
//! separator = "_"
//! max_attempts = 10000
//! ```

#![warn(missing_docs)]

mod artifacts;
mod config;
mod error;
mod organizer;
mod report;
mod tree;

pub use artifacts::{load_index, load_report, write_index, write_report, INDEX_FILE, REPORT_FILE};
pub use config::{CollisionNaming, OrganizerConfig, PlacementMode};
pub use error::OrganizerError;
pub use organizer::{Organizer, Placement, PlacementRequest};
pub use report::ReportBuilder;
pub use tree::{FsOutputTree, OutputTree};
