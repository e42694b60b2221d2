//! PDF content extractor.
//!
//! Uses lopdf for both text and the `Info` dictionary.

use async_trait::async_trait;
use lopdf::{Document, Object};
use pdfsorter_domain::{ExtractedText, ExtractionError, TextExtractor};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Default cap on extracted characters
pub const DEFAULT_MAX_CHARS: usize = 100_000;

/// Extractor for PDF files.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    max_chars: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Cap the extracted text at `max_chars` characters.
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    /// Extract text from the first `max_pages` pages (`0` means all pages).
    async fn extract(&self, path: &Path, max_pages: usize) -> Result<ExtractedText, ExtractionError> {
        debug!("Extracting PDF: {:?}", path);

        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExtractionError::NotFound(path.to_path_buf()),
            _ => ExtractionError::from(e),
        })?;

        let max_chars = self.max_chars;
        tokio::task::spawn_blocking(move || extract_from_bytes(&bytes, max_pages, max_chars))
            .await
            .map_err(|e| ExtractionError::Io(format!("Task join error: {e}")))?
    }
}

fn extract_from_bytes(
    bytes: &[u8],
    max_pages: usize,
    max_chars: usize,
) -> Result<ExtractedText, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Corrupted(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(ExtractionError::Encrypted);
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let limit = if max_pages == 0 { pages.len() } else { max_pages };
    let mut text = String::new();
    for page_number in pages.keys().take(limit) {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(page_text.trim_end());
                text.push('\n');
            }
            Ok(_) => debug!("Page {} has no text layer", page_number),
            Err(e) => debug!("Skipping page {}: {}", page_number, e),
        }
    }
    truncate_chars(&mut text, max_chars);

    Ok(ExtractedText {
        text,
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
        page_count: pages.len(),
        size_bytes: bytes.len() as u64,
    })
}

/// Read a string entry of the trailer's `Info` dictionary.
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    match info.get(key).ok()? {
        Object::String(bytes, _) => {
            let value = decode_pdf_string(bytes);
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise UTF-8 or Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}
