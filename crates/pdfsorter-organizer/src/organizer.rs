//! Sequential placement of documents into their assigned folders

use crate::config::OrganizerConfig;
use crate::error::OrganizerError;
use crate::tree::OutputTree;
use pdfsorter_domain::{DocumentStatus, FailureKind, IndexEntry, Judgment, ReportEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One document to place: its judgment and the folder assigned to it
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    /// Judgment for the document
    pub judgment: &'a Judgment,

    /// Assigned folder name
    pub folder: &'a str,
}

/// Outcome of placing one document
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Original location of the file
    pub source_path: PathBuf,

    /// Assigned folder
    pub folder: String,

    /// Where the file ended up, if it was placed
    pub destination: Option<PathBuf>,

    /// Final status
    pub status: DocumentStatus,

    /// Failure kind, for failed documents
    pub failure: Option<FailureKind>,

    /// Error or skip detail
    pub error: Option<String>,

    /// Raw topic from the judgment
    pub topic: String,

    /// Summary from the judgment
    pub summary: String,

    /// Entities from the judgment
    pub entities: Vec<String>,
}

impl Placement {
    fn new(request: &PlacementRequest<'_>) -> Self {
        let judgment = request.judgment;
        Self {
            source_path: judgment.source_path().to_path_buf(),
            folder: request.folder.to_string(),
            destination: None,
            status: DocumentStatus::from(judgment.status()),
            failure: judgment.failure(),
            error: judgment.error().map(str::to_string),
            topic: judgment.topic().to_string(),
            summary: judgment.summary().to_string(),
            entities: judgment.entities().to_vec(),
        }
    }

    /// Record of `index.json`
    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            source_path: display(&self.source_path),
            destination_path: self.destination.as_deref().map(display),
            topic: self.topic.clone(),
            summary: self.summary.clone(),
            entities: self.entities.clone(),
            status: self.status,
        }
    }

    /// Per-document line of `report.json`
    pub fn report_entry(&self) -> ReportEntry {
        ReportEntry {
            source_path: display(&self.source_path),
            folder: self.folder.clone(),
            status: self.status,
            failure: self.failure,
            error: self.error.clone(),
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Places documents into the output tree, one at a time
pub struct Organizer<T: OutputTree> {
    tree: T,
    config: OrganizerConfig,
}

impl<T: OutputTree> Organizer<T> {
    /// Create a new Organizer
    ///
    /// # Errors
    ///
    /// Returns [`OrganizerError::Config`] if the configuration is invalid.
    pub fn new(tree: T, config: OrganizerConfig) -> Result<Self, OrganizerError> {
        config.validate().map_err(OrganizerError::Config)?;
        Ok(Self { tree, config })
    }

    /// Output tree
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Active configuration
    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Place every requested document
    ///
    /// A failed placement marks the document `MoveFailed` and processing
    /// continues. Skipped documents are not placed.
    pub fn organize(&self, requests: &[PlacementRequest<'_>]) -> Vec<Placement> {
        self.organize_with(requests, |_| {})
    }

    /// Like [`organize`](Self::organize), calling `on_placed` after each document
    pub fn organize_with<F>(&self, requests: &[PlacementRequest<'_>], mut on_placed: F) -> Vec<Placement>
    where
        F: FnMut(&Placement),
    {
        let mut placements = Vec::with_capacity(requests.len());

        for request in requests {
            let mut placement = Placement::new(request);

            if placement.status != DocumentStatus::Skipped {
                match self.place(request) {
                    Ok(destination) => {
                        debug!("Placed {:?} at {:?}", placement.source_path, destination);
                        placement.destination = Some(destination);
                    }
                    Err(e) => {
                        warn!("Failed to place {:?}: {}", placement.source_path, e);
                        placement.status = DocumentStatus::MoveFailed;
                        placement.failure = Some(FailureKind::MoveFailed);
                        placement.error = Some(e.to_string());
                    }
                }
            }

            on_placed(&placement);
            placements.push(placement);
        }

        let placed = placements.iter().filter(|p| p.destination.is_some()).count();
        info!("Placed {} of {} documents", placed, placements.len());
        placements
    }

    fn place(&self, request: &PlacementRequest<'_>) -> Result<PathBuf, OrganizerError> {
        let folder = self.tree.ensure_folder(request.folder)?;
        let source = request.judgment.source_path();
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        self.tree.place_file(
            source,
            &folder,
            &file_name,
            self.config.placement_mode,
            &self.config.collision,
        )
    }
}
