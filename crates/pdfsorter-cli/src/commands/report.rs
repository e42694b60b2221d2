//! Report command implementation.

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use pdfsorter_domain::RunReport;
use pdfsorter_organizer::load_report;

/// Execute the report command.
pub fn execute_report(args: ReportArgs, config: &Config, formatter: &Formatter) -> Result<RunReport> {
    let root = args
        .output
        .unwrap_or_else(|| config.pipeline.output_dir.clone());
    let report = load_report(&root)?;

    println!("{}", formatter.format_report(&report)?);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use pdfsorter_organizer::{write_report, FsOutputTree, ReportBuilder};
    use std::time::Duration;
    use tempfile::tempdir;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    #[test]
    fn test_shows_last_report() {
        let out = tempdir().unwrap();
        let report = ReportBuilder::new("run-42", 1_700_000_000).finish(Duration::from_secs(2));
        write_report(&FsOutputTree::new(out.path()), &report).unwrap();

        let args = ReportArgs {
            output: Some(out.path().to_path_buf()),
        };
        let shown = execute_report(args, &Config::default(), &formatter()).unwrap();
        assert_eq!(shown, report);
    }

    #[test]
    fn test_uses_configured_output_dir() {
        let out = tempdir().unwrap();
        let report = ReportBuilder::new("run-43", 1_700_000_000).finish(Duration::from_secs(1));
        write_report(&FsOutputTree::new(out.path()), &report).unwrap();

        let mut config = Config::default();
        config.pipeline.output_dir = out.path().to_path_buf();
        let shown = execute_report(ReportArgs::default(), &config, &formatter()).unwrap();
        assert_eq!(shown.run_id, "run-43");
    }

    #[test]
    fn test_missing_report() {
        let out = tempdir().unwrap();
        let args = ReportArgs {
            output: Some(out.path().to_path_buf()),
        };
        let result = execute_report(args, &Config::default(), &formatter());
        assert!(matches!(result, Err(CliError::Organizer(_))));
    }
}
