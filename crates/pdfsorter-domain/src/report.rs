//! Persisted views of a run: index entries and the run report

use crate::judgment::{FailureKind, JudgmentStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final status of a document after organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Classified and placed
    Success,
    /// Extraction failed, placed in the fallback folder
    ExtractionFailed,
    /// Model failed, placed in the fallback folder
    ModelFailed,
    /// Not analyzed and not placed in this run
    Skipped,
    /// Placement failed, source left untouched
    MoveFailed,
}

impl DocumentStatus {
    /// Name used in the report
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Success => "Success",
            DocumentStatus::ExtractionFailed => "ExtractionFailed",
            DocumentStatus::ModelFailed => "ModelFailed",
            DocumentStatus::Skipped => "Skipped",
            DocumentStatus::MoveFailed => "MoveFailed",
        }
    }

    /// Whether this status counts as a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            DocumentStatus::ExtractionFailed | DocumentStatus::ModelFailed | DocumentStatus::MoveFailed
        )
    }
}

impl From<JudgmentStatus> for DocumentStatus {
    fn from(status: JudgmentStatus) -> Self {
        match status {
            JudgmentStatus::Success => DocumentStatus::Success,
            JudgmentStatus::ExtractionFailed => DocumentStatus::ExtractionFailed,
            JudgmentStatus::ModelFailed => DocumentStatus::ModelFailed,
            JudgmentStatus::Skipped => DocumentStatus::Skipped,
        }
    }
}

/// One record of `index.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Original location of the file
    pub source_path: String,

    /// Where the file was placed; `None` when it was not placed
    pub destination_path: Option<String>,

    /// Raw topic (or the fallback topic)
    pub topic: String,

    /// Summary text
    pub summary: String,

    /// Key entities
    pub entities: Vec<String>,

    /// Final status
    pub status: DocumentStatus,
}

/// Per-document line of `report.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Original location of the file
    pub source_path: String,

    /// Assigned folder
    pub folder: String,

    /// Final status
    pub status: DocumentStatus,

    /// Failure kind, for failed documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    /// Error or skip detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate statistics and per-document status for one run (`report.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: String,

    /// Run start, seconds since the Unix epoch
    pub started_at: u64,

    /// Number of input documents
    pub total: usize,

    /// Documents classified and placed
    pub succeeded: usize,

    /// Documents not processed in this run
    pub skipped: usize,

    /// Documents that failed at any stage
    pub failed: usize,

    /// Failures keyed by [`FailureKind`] name
    pub failed_by_kind: BTreeMap<String, usize>,

    /// Documents per final status name
    pub status_counts: BTreeMap<String, usize>,

    /// Files placed per folder
    pub per_folder_counts: BTreeMap<String, usize>,

    /// Wall-clock duration of the run
    pub duration_seconds: f64,

    /// Whether the run stopped early on request
    pub cancelled: bool,

    /// One entry per input document, input order
    pub documents: Vec<ReportEntry>,
}

impl RunReport {
    /// Check that every input document is accounted for exactly once
    pub fn accounts_for_all(&self) -> bool {
        let by_status: usize = self.status_counts.values().sum();
        self.documents.len() == self.total
            && by_status == self.total
            && self.succeeded + self.skipped + self.failed == self.total
    }

    /// Number of documents with the given final status
    pub fn count(&self, status: DocumentStatus) -> usize {
        self.status_counts.get(status.as_str()).copied().unwrap_or(0)
    }

    /// Human-readable summary of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Run {}", self.run_id),
            "========".to_string(),
            format!("Documents: {}", self.total),
            format!("Succeeded: {}", self.succeeded),
            format!("Skipped: {}", self.skipped),
            format!("Failed: {}", self.failed),
            format!("Duration: {:.1}s", self.duration_seconds),
        ];
        if self.cancelled {
            lines.push("Cancelled before completion".to_string());
        }

        if !self.failed_by_kind.is_empty() {
            lines.push(String::new());
            lines.push("Failures by kind:".to_string());
            for (kind, count) in &self.failed_by_kind {
                lines.push(format!("  {}: {}", kind, count));
            }
        }

        if !self.per_folder_counts.is_empty() {
            lines.push(String::new());
            lines.push("Files per folder:".to_string());
            for (folder, count) in &self.per_folder_counts {
                lines.push(format!("  {}: {}", folder, count));
            }
        }

        lines.join("\n")
    }
}
