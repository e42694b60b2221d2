//! pdfsorter - Sort a directory of PDF files into topic folders with a local LLM.

use clap::Parser;
use pdfsorter_cli::commands;
use pdfsorter_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> pdfsorter_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // File, then environment; run flags are applied by the run command
    let path = Config::path(cli.config.as_deref())?;
    let mut config = Config::load(&path, cli.config.is_some())?;
    config.apply_process_env()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.pipeline.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &mut config, &formatter).await?;
        }
        Command::Check => {
            commands::execute_check(&config, &formatter).await?;
        }
        Command::Report(args) => {
            commands::execute_report(args, &config, &formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &path, &formatter)?;
        }
    }

    Ok(())
}
