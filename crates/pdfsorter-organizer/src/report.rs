//! Run statistics collection

use crate::organizer::Placement;
use pdfsorter_domain::{DocumentStatus, RunReport};
use std::collections::BTreeMap;
use std::time::Duration;

/// Accumulates placements into a [`RunReport`]
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    report: RunReport,
}

impl ReportBuilder {
    /// Start an empty report
    pub fn new(run_id: impl Into<String>, started_at: u64) -> Self {
        Self {
            report: RunReport {
                run_id: run_id.into(),
                started_at,
                total: 0,
                succeeded: 0,
                skipped: 0,
                failed: 0,
                failed_by_kind: BTreeMap::new(),
                status_counts: BTreeMap::new(),
                per_folder_counts: BTreeMap::new(),
                duration_seconds: 0.0,
                cancelled: false,
                documents: Vec::new(),
            },
        }
    }

    /// Record the outcome of one document
    pub fn record(&mut self, placement: &Placement) {
        let report = &mut self.report;
        report.total += 1;

        match placement.status {
            DocumentStatus::Success => report.succeeded += 1,
            DocumentStatus::Skipped => report.skipped += 1,
            _ => report.failed += 1,
        }
        *report
            .status_counts
            .entry(placement.status.as_str().to_string())
            .or_insert(0) += 1;

        if let Some(kind) = placement.failure {
            *report
                .failed_by_kind
                .entry(kind.as_str().to_string())
                .or_insert(0) += 1;
        }
        if placement.destination.is_some() {
            *report
                .per_folder_counts
                .entry(placement.folder.clone())
                .or_insert(0) += 1;
        }

        report.documents.push(placement.report_entry());
    }

    /// Record several outcomes in order
    pub fn record_all<'a>(&mut self, placements: impl IntoIterator<Item = &'a Placement>) {
        for placement in placements {
            self.record(placement);
        }
    }

    /// Flag the run as stopped early
    pub fn mark_cancelled(&mut self) {
        self.report.cancelled = true;
    }

    /// Number of documents recorded so far
    pub fn recorded(&self) -> usize {
        self.report.total
    }

    /// Finish the report with the run's wall-clock duration
    pub fn finish(mut self, duration: Duration) -> RunReport {
        self.report.duration_seconds = duration.as_secs_f64();
        self.report
    }
}
