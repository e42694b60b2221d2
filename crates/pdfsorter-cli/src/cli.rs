//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pdfsorter - Sort a directory of PDF files into topic folders with a local LLM.
#[derive(Debug, Parser)]
#[command(name = "pdfsorter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.pdfsorter/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (run ID only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify and organize every PDF in the input directory
    Run(RunArgs),

    /// Check that the model server is reachable and the model installed
    Check,

    /// Show the report written by the last run
    Report(ReportArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Configuration preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// One document at a time, long timeouts
    Conservative,
    /// Wide batches, fewer pages, short timeouts
    Fast,
}

/// Arguments for the run command.
#[derive(Debug, Default, Parser)]
pub struct RunArgs {
    /// Directory containing the PDF files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Root of the organized output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Model server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Documents analyzed concurrently
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Pages read per document (0 reads every page)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Start from a preset instead of the configuration file
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Move files instead of copying them
    #[arg(long = "move")]
    pub move_files: bool,

    /// Skip documents already listed in the output index
    #[arg(long)]
    pub skip_indexed: bool,

    /// Do not write index.json
    #[arg(long)]
    pub no_index: bool,
}

/// Arguments for the report command.
#[derive(Debug, Default, Parser)]
pub struct ReportArgs {
    /// Output root holding report.json (default: the configured output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Write the default configuration file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "pdfsorter",
            "run",
            "--input",
            "papers",
            "--batch-size",
            "2",
            "--move",
            "--skip-indexed",
        ]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.input, Some(PathBuf::from("papers")));
                assert_eq!(args.batch_size, Some(2));
                assert!(args.move_files);
                assert!(args.skip_indexed);
                assert!(!args.no_index);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["pdfsorter", "check", "--format", "json", "--no-color"]);
        assert!(matches!(cli.command, Command::Check));
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Cli::try_parse_from(["pdfsorter", "config", "--force"]).is_err());
        let cli = Cli::parse_from(["pdfsorter", "config", "--init", "--force"]);
        assert!(matches!(cli.command, Command::Config(ConfigArgs { init: true, force: true })));
    }

    #[test]
    fn test_report_command() {
        let cli = Cli::parse_from(["pdfsorter", "report", "--output", "sorted"]);
        match cli.command {
            Command::Report(args) => assert_eq!(args.output, Some(PathBuf::from("sorted"))),
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["pdfsorter"]).is_err());
    }
}
