//! Document module - one PDF as seen by a single run

use std::path::{Path, PathBuf};

/// Text and metadata returned by a [`TextExtractor`](crate::traits::TextExtractor)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Extracted text, already limited to the page cap
    pub text: String,

    /// Title from the PDF info dictionary
    pub title: Option<String>,

    /// Author from the PDF info dictionary
    pub author: Option<String>,

    /// Total number of pages in the file (not only the extracted ones)
    pub page_count: usize,

    /// File size in bytes
    pub size_bytes: u64,
}

/// A document under classification
///
/// Identity is the source path. A document is created once, right after
/// extraction, and is never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    text: String,
    title: Option<String>,
    author: Option<String>,
    page_count: usize,
    size_bytes: u64,
}

impl Document {
    /// Build a document from its source path and the extractor output
    pub fn new(path: impl Into<PathBuf>, extracted: ExtractedText) -> Self {
        Self {
            path: path.into(),
            text: extracted.text,
            title: non_blank(extracted.title),
            author: non_blank(extracted.author),
            page_count: extracted.page_count,
            size_bytes: extracted.size_bytes,
        }
    }

    /// Absolute source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component of the source path
    ///
    /// Falls back to `document.pdf` for paths without a final component.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string())
    }

    /// Extracted text (possibly truncated, possibly empty)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any non-whitespace text was extracted
    ///
    /// Image-only and unreadable PDFs come back with blank text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Document title, if the file declares one
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Document author, if the file declares one
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Page count of the source file
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Size of the source file in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
