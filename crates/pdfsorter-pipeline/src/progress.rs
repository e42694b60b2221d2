//! Progress events emitted during a run

use pdfsorter_domain::{Judgment, RunReport};
use pdfsorter_organizer::Placement;

/// Receives progress events from [`Pipeline::run`](crate::Pipeline::run)
///
/// Every method has a no-op default, so implementors only override the
/// events they render. Events arrive in this order: `run_started`, then per
/// group `group_started` followed by one `document_analyzed` per document,
/// then one `document_placed` per document, then `run_finished`.
pub trait ProgressObserver: Send + Sync {
    /// A run discovered `total` documents
    fn run_started(&self, _run_id: &str, _total: usize) {}

    /// Group `group` (1-based) of `groups` starts with `size` documents
    fn group_started(&self, _group: usize, _groups: usize, _size: usize) {}

    /// A document has its judgment
    fn document_analyzed(&self, _judgment: &Judgment) {}

    /// A document reached its final status
    fn document_placed(&self, _placement: &Placement) {}

    /// The run finished and its artifacts are written
    fn run_finished(&self, _report: &RunReport) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
