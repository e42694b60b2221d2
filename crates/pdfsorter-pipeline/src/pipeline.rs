//! Run orchestration

use crate::config::PipelineConfig;
use crate::discovery::discover_pdfs;
use crate::error::PipelineError;
use crate::progress::{NoopObserver, ProgressObserver};
use futures::future::join_all;
use pdfsorter_analyzer::Analyzer;
use pdfsorter_domain::{
    Document, DocumentStatus, IndexEntry, Judgment, ModelClient, RunReport, TextExtractor,
};
use pdfsorter_organizer::{
    load_index, write_index, write_report, FsOutputTree, Organizer, OutputTree, PlacementRequest,
    ReportBuilder,
};
use pdfsorter_taxonomy::TaxonomyResolver;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Detail recorded for documents a previous run already sorted
pub const SKIP_ALREADY_INDEXED: &str = "already indexed";

/// Detail recorded for documents never reached before cancellation
pub const SKIP_CANCELLED: &str = "run cancelled";

/// Seconds since the Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Runs the whole sort: discover, analyze, resolve, organize, report
///
/// # Examples
///
/// ```no_run
/// use pdfsorter_extract::PdfExtractor;
/// use pdfsorter_llm::OllamaProvider;
/// use pdfsorter_pipeline::{Pipeline, PipelineConfig};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PipelineConfig::default();
///     let client = OllamaProvider::new(&config.base_url)?;
///     let pipeline = Pipeline::new(config, PdfExtractor::default(), client)?;
///
///     let report = pipeline.run(&CancellationToken::new()).await?;
///     println!("{}", report.summary());
///     Ok(())
/// }
/// ```
pub struct Pipeline<E: TextExtractor, M: ModelClient> {
    config: Arc<PipelineConfig>,
    extractor: Arc<E>,
    analyzer: Analyzer<M>,
    resolver: TaxonomyResolver,
    observer: Arc<dyn ProgressObserver>,
}

impl<E: TextExtractor, M: ModelClient> Pipeline<E, M> {
    /// Create a pipeline
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if any section of the
    /// configuration is invalid.
    pub fn new(config: PipelineConfig, extractor: E, client: M) -> Result<Self, PipelineError> {
        Self::with_shared(config, Arc::new(extractor), Arc::new(client))
    }

    /// Create a pipeline around collaborators shared with other owners
    pub fn with_shared(
        config: PipelineConfig,
        extractor: Arc<E>,
        client: Arc<M>,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Configuration)?;

        let analyzer = Analyzer::with_shared_client(client, config.analyzer.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let resolver = TaxonomyResolver::new(config.taxonomy.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            extractor,
            analyzer,
            resolver,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Report progress to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one sort over the input directory
    ///
    /// Per-document failures are recorded in the report; the run only fails
    /// when it cannot start or cannot write its artifacts. Cancellation is
    /// checked between groups: calls already in flight complete, documents
    /// not yet reached are reported as skipped.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunReport, PipelineError> {
        let started = Instant::now();
        let started_at = current_timestamp();
        let run_id = Uuid::now_v7().to_string();

        let files = discover_pdfs(&self.config.input_dir)?;
        let tree = FsOutputTree::new(&self.config.output_dir);
        tree.ensure_root().map_err(PipelineError::OutputDirectory)?;

        info!(
            "Run {} started: {} documents from {:?}",
            run_id,
            files.len(),
            self.config.input_dir
        );
        self.observer.run_started(&run_id, files.len());

        let previous = self.previously_sorted(tree.root());
        let mut judgments: Vec<Option<Judgment>> = Vec::with_capacity(files.len());
        let mut carried: Vec<Option<IndexEntry>> = Vec::with_capacity(files.len());
        let mut pending: Vec<(usize, &Path)> = Vec::new();

        for (slot, path) in files.iter().enumerate() {
            match previous.get(&path_key(path)) {
                Some(entry) => {
                    debug!("Skipping {:?}: {}", path, SKIP_ALREADY_INDEXED);
                    judgments.push(Some(Judgment::skipped(path, SKIP_ALREADY_INDEXED)));
                    carried.push(Some(entry.clone()));
                }
                None => {
                    judgments.push(None);
                    carried.push(None);
                    pending.push((slot, path.as_path()));
                }
            }
        }

        let cancelled = self.analyze_groups(&pending, &mut judgments, cancel).await;

        let judgments: Vec<Judgment> = judgments
            .into_iter()
            .zip(&files)
            .map(|(judgment, path)| {
                judgment.unwrap_or_else(|| Judgment::skipped(path, SKIP_CANCELLED))
            })
            .collect();

        let resolution = self.resolver.resolve(&judgments)?;
        let requests: Vec<PlacementRequest<'_>> = judgments
            .iter()
            .zip(&resolution.assignments)
            .map(|(judgment, assignment)| PlacementRequest {
                judgment,
                folder: assignment.folder.as_str(),
            })
            .collect();

        let organizer = Organizer::new(tree, self.config.organizer.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let placements = organizer.organize_with(&requests, |placement| {
            self.observer.document_placed(placement)
        });

        let mut builder = ReportBuilder::new(run_id, started_at);
        builder.record_all(&placements);
        if cancelled {
            builder.mark_cancelled();
        }
        let report = builder.finish(started.elapsed());

        if self.config.generate_index {
            let index: Vec<IndexEntry> = placements
                .iter()
                .zip(carried)
                .map(|(placement, carried)| carried.unwrap_or_else(|| placement.index_entry()))
                .collect();
            write_index(organizer.tree(), &index).map_err(PipelineError::Artifact)?;
        }
        write_report(organizer.tree(), &report).map_err(PipelineError::Artifact)?;

        info!(
            "Run {} finished in {:.1}s: {} succeeded, {} skipped, {} failed",
            report.run_id, report.duration_seconds, report.succeeded, report.skipped, report.failed
        );
        debug!("Run summary:\n{}", report.summary());
        self.observer.run_finished(&report);

        Ok(report)
    }

    /// Analyze pending documents in groups of `batch_size`
    ///
    /// Returns `true` if the run was cancelled before every group started.
    async fn analyze_groups(
        &self,
        pending: &[(usize, &Path)],
        judgments: &mut [Option<Judgment>],
        cancel: &CancellationToken,
    ) -> bool {
        let groups: Vec<&[(usize, &Path)]> = pending.chunks(self.config.batch_size).collect();

        for (number, group) in groups.iter().enumerate() {
            if cancel.is_cancelled() {
                let remaining: usize = groups[number..].iter().map(|g| g.len()).sum();
                warn!("Run cancelled, {} documents not processed", remaining);
                return true;
            }

            debug!("Group {}/{}: {} documents", number + 1, groups.len(), group.len());
            self.observer.group_started(number + 1, groups.len(), group.len());

            let results = join_all(group.iter().map(|(_, path)| self.process(path))).await;
            for ((slot, _), judgment) in group.iter().zip(results) {
                self.observer.document_analyzed(&judgment);
                judgments[*slot] = Some(judgment);
            }
        }
        false
    }

    /// Extract and analyze one document
    async fn process(&self, path: &Path) -> Judgment {
        let extracted = match self.extractor.extract(path, self.config.max_pages).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Extraction failed for {:?}: {}", path, e);
                return Judgment::extraction_failed(path, e.to_string());
            }
        };

        let document = Document::new(path, extracted);
        let judgment = self.analyzer.analyze(&document).await;
        info!(
            "{}: {} ({:?})",
            document.file_name(),
            judgment.topic(),
            judgment.status()
        );
        judgment
    }

    /// Successful entries of the previous index, keyed by source path
    fn previously_sorted(&self, root: &Path) -> HashMap<String, IndexEntry> {
        if !self.config.skip_indexed {
            return HashMap::new();
        }

        let sorted: HashMap<String, IndexEntry> = load_index(root)
            .into_iter()
            .filter(|entry| entry.status == DocumentStatus::Success)
            .map(|entry| (entry.source_path.clone(), entry))
            .collect();
        debug!("{} documents already indexed", sorted.len());
        sorted
    }
}

fn path_key(path: &Path) -> String {
    path.display().to_string()
}
