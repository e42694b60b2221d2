//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pdfsorter_domain::{DocumentStatus, RunReport};
use pdfsorter_llm::HealthStatus;
use pdfsorter_organizer::Placement;
use pdfsorter_pipeline::ProgressObserver;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the final run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(report.run_id.clone()),
        }
    }

    /// Format the report as summary tables.
    fn format_report_table(&self, report: &RunReport) -> String {
        let mut sections = Vec::new();

        let mut builder = Builder::default();
        builder.push_record(["Total", "Succeeded", "Skipped", "Failed", "Duration"]);
        builder.push_record([
            report.total.to_string(),
            report.succeeded.to_string(),
            report.skipped.to_string(),
            report.failed.to_string(),
            format!("{:.1}s", report.duration_seconds),
        ]);
        sections.push(styled(builder));

        if !report.per_folder_counts.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Folder", "Files"]);
            for (folder, count) in &report.per_folder_counts {
                builder.push_record([folder.clone(), count.to_string()]);
            }
            sections.push(styled(builder));
        }

        if !report.failed_by_kind.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Failure", "Documents"]);
            for (kind, count) in &report.failed_by_kind {
                builder.push_record([kind.clone(), count.to_string()]);
            }
            sections.push(styled(builder));
        }

        if report.cancelled {
            sections.push(self.warning("Run cancelled; remaining documents were skipped"));
        } else if report.total == 0 {
            sections.push(self.warning("No PDF files found"));
        }

        sections.join("\n")
    }

    /// One progress line for a finished document.
    pub fn placement_line(&self, placement: &Placement) -> String {
        let name = placement
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| placement.source_path.display().to_string());

        match placement.status {
            DocumentStatus::Success => self.success(&format!("{} → {}", name, placement.folder)),
            DocumentStatus::Skipped => {
                let reason = placement.error.as_deref().unwrap_or("skipped");
                self.info(&format!("{} skipped ({})", name, reason))
            }
            _ => {
                let kind = placement
                    .failure
                    .map(|k| k.as_str())
                    .unwrap_or(placement.status.as_str());
                let detail = placement.error.as_deref().unwrap_or("");
                match &placement.destination {
                    Some(_) => self.warning(&format!(
                        "{} → {} ({}: {})",
                        name, placement.folder, kind, detail
                    )),
                    None => self.error(&format!("{} not placed ({}: {})", name, kind, detail)),
                }
            }
        }
    }

    /// Format a health check result.
    pub fn health(&self, status: &HealthStatus, model: &str) -> String {
        let mut lines = vec![self.success(&format!("Model server reachable at {}", status.endpoint))];
        if status.model_available {
            lines.push(self.success(&format!("Model '{}' is installed", model)));
        } else {
            lines.push(self.warning(&format!("Model '{}' is not installed", model)));
        }
        if !status.models.is_empty() {
            lines.push(self.info(&format!("Available models: {}", status.models.join(", "))));
        }
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Prints progress to stderr so stdout carries only the final output.
pub struct ConsoleProgress {
    formatter: Formatter,
}

impl ConsoleProgress {
    /// Create a progress printer.
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn run_started(&self, _run_id: &str, total: usize) {
        eprintln!("{}", self.formatter.info(&format!("Found {} PDF files", total)));
    }

    fn group_started(&self, group: usize, groups: usize, size: usize) {
        eprintln!(
            "{}",
            self.formatter
                .info(&format!("Analyzing batch {}/{} ({} documents)", group, groups, size))
        );
    }

    fn document_placed(&self, placement: &Placement) {
        eprintln!("{}", self.formatter.placement_line(placement));
    }
}
