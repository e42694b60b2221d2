//! Input discovery

use crate::error::PipelineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the PDF files directly inside `dir`, sorted by path
///
/// Matches the `.pdf` extension case-insensitively. Subdirectories are not
/// searched. Returned paths are absolute.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let input_error = |e: std::io::Error| PipelineError::InputDirectory {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let root = fs::canonicalize(dir).map_err(input_error)?;
    let mut files = Vec::new();
    for entry in fs::read_dir(&root).map_err(input_error)? {
        let path = entry.map_err(input_error)?.path();
        if path.is_file() && is_pdf(&path) {
            files.push(path);
        }
    }
    files.sort();

    debug!("Found {} PDF files in {:?}", files.len(), root);
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
