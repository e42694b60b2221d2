//! `index.json` and `report.json`

use crate::error::OrganizerError;
use crate::tree::OutputTree;
use pdfsorter_domain::{IndexEntry, RunReport};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the document index
pub const INDEX_FILE: &str = "index.json";

/// File name of the run report
pub const REPORT_FILE: &str = "report.json";

/// Write the document index, replacing any previous one
pub fn write_index<T: OutputTree + ?Sized>(
    tree: &T,
    entries: &[IndexEntry],
) -> Result<PathBuf, OrganizerError> {
    let json = serde_json::to_vec_pretty(entries)?;
    let path = tree.write_artifact(INDEX_FILE, &json)?;
    debug!("Wrote {} index entries to {:?}", entries.len(), path);
    Ok(path)
}

/// Write the run report, replacing any previous one
pub fn write_report<T: OutputTree + ?Sized>(
    tree: &T,
    report: &RunReport,
) -> Result<PathBuf, OrganizerError> {
    let json = serde_json::to_vec_pretty(report)?;
    let path = tree.write_artifact(REPORT_FILE, &json)?;
    debug!("Wrote report for run {} to {:?}", report.run_id, path);
    Ok(path)
}

/// Read the index left by a previous run
///
/// A missing index yields an empty list. An unreadable or malformed index is
/// logged and treated as empty.
pub fn load_index(root: &Path) -> Vec<IndexEntry> {
    let path = root.join(INDEX_FILE);
    let contents = match fs::read(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("Could not read {:?}: {}", path, e);
            return Vec::new();
        }
    };

    match serde_json::from_slice(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring malformed index {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Read a report written by a previous run
pub fn load_report(root: &Path) -> Result<RunReport, OrganizerError> {
    let path = root.join(REPORT_FILE);
    let contents = fs::read(&path).map_err(|e| OrganizerError::io(&path, e))?;
    Ok(serde_json::from_slice(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportBuilder;
    use crate::tree::FsOutputTree;
    use pdfsorter_domain::DocumentStatus;
    use std::time::Duration;
    use tempfile::tempdir;

    fn entry(source: &str, destination: Option<&str>, status: DocumentStatus) -> IndexEntry {
        IndexEntry {
            source_path: source.to_string(),
            destination_path: destination.map(str::to_string),
            topic: "Finance".to_string(),
            summary: "Quarterly results.".to_string(),
            entities: vec!["ACME".to_string()],
            status,
        }
    }

    #[test]
    fn test_index_round_trip() {
        let out = tempdir().unwrap();
        let tree = FsOutputTree::new(out.path());
        let entries = vec![
            entry("/in/a.pdf", Some("/out/Finance/a.pdf"), DocumentStatus::Success),
            entry("/in/b.pdf", None, DocumentStatus::MoveFailed),
        ];

        let path = write_index(&tree, &entries).unwrap();
        assert_eq!(path, out.path().join(INDEX_FILE));
        assert_eq!(load_index(out.path()), entries);
    }

    #[test]
    fn test_index_is_a_json_array() {
        let out = tempdir().unwrap();
        let tree = FsOutputTree::new(out.path());
        write_index(&tree, &[entry("/in/a.pdf", None, DocumentStatus::Skipped)]).unwrap();

        let raw = fs::read_to_string(out.path().join(INDEX_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert!(value[0]["destination_path"].is_null());
        assert_eq!(value[0]["status"], "Skipped");
    }

    #[test]
    fn test_missing_or_corrupt_index_is_empty() {
        let out = tempdir().unwrap();
        assert!(load_index(out.path()).is_empty());

        fs::write(out.path().join(INDEX_FILE), "{ not json").unwrap();
        assert!(load_index(out.path()).is_empty());
    }

    #[test]
    fn test_report_round_trip() {
        let out = tempdir().unwrap();
        let tree = FsOutputTree::new(out.path());
        let report = ReportBuilder::new("run-7", 1_700_000_000).finish(Duration::from_secs(3));

        write_report(&tree, &report).unwrap();
        assert_eq!(load_report(out.path()).unwrap(), report);
    }

    #[test]
    fn test_load_report_missing() {
        let out = tempdir().unwrap();
        assert!(matches!(load_report(out.path()), Err(OrganizerError::Io { .. })));
    }
}
