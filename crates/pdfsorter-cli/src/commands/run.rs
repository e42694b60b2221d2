//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::{ConsoleProgress, Formatter};
use pdfsorter_domain::RunReport;
use pdfsorter_extract::PdfExtractor;
use pdfsorter_llm::OllamaProvider;
use pdfsorter_pipeline::Pipeline;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<RunReport> {
    config.apply_run_args(&args);
    let pipeline_config = config.pipeline.clone();

    let client = OllamaProvider::new(&pipeline_config.base_url)?;
    let mut pipeline = Pipeline::new(pipeline_config, PdfExtractor::default(), client)?;
    if formatter.format() != OutputFormat::Quiet {
        pipeline = pipeline.with_observer(Arc::new(ConsoleProgress::new(*formatter)));
    }

    // Ctrl-C stops new batches; documents in flight finish first
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing the current batch");
                cancel.cancel();
            }
        })
    };

    let result = pipeline.run(&cancel).await;
    interrupt.abort();
    let report = result?;

    println!("{}", formatter.format_report(&report)?);
    Ok(report)
}
