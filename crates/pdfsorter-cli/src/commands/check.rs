//! Check command implementation.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pdfsorter_llm::OllamaProvider;

/// Execute the check command.
///
/// Fails when the server is unreachable or the configured model is missing.
pub async fn execute_check(config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline = &config.pipeline;
    let provider = OllamaProvider::new(&pipeline.base_url)?;
    let status = provider.health_check(&pipeline.analyzer.model).await?;

    println!("{}", formatter.health(&status, &pipeline.analyzer.model));

    if !status.model_available {
        return Err(CliError::ModelMissing(pipeline.analyzer.model.clone()));
    }
    Ok(())
}
