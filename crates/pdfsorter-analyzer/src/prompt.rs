//! LLM prompt engineering for document classification

use crate::config::AnalyzerConfig;
use pdfsorter_domain::Document;

/// Builds the classification prompt for one document
pub struct PromptBuilder<'a> {
    file_name: String,
    text: &'a str,
    title: Option<&'a str>,
    author: Option<&'a str>,
    summary_words: usize,
    max_entities: usize,
    max_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for a document with the configured budgets
    pub fn new(document: &'a Document, config: &AnalyzerConfig) -> Self {
        Self {
            file_name: document.file_name(),
            text: document.text(),
            title: document.title(),
            author: document.author(),
            summary_words: config.summary_words,
            max_entities: config.max_entities,
            max_chars: config.max_prompt_chars,
        }
    }

    /// Whether the prompt is built from metadata only
    pub fn is_metadata_only(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Build the complete classification prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Instructions
        prompt.push_str(CLASSIFY_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "- The summary must be at most {} words.\n",
            self.summary_words
        ));
        prompt.push_str(&format!(
            "- List at most {} key entities (people, organizations, concepts).\n\n",
            self.max_entities
        ));

        // 2. Metadata
        prompt.push_str(&format!("File name: {}\n", self.file_name));
        if let Some(title) = self.title {
            prompt.push_str(&format!("Title: {}\n", title));
        }
        if let Some(author) = self.author {
            prompt.push_str(&format!("Author: {}\n", author));
        }
        prompt.push('\n');

        // 3. Document text, or a note that there is none
        if self.is_metadata_only() {
            prompt.push_str(METADATA_ONLY_NOTE);
            prompt.push_str("\n\n");
        } else {
            prompt.push_str("Text:\n---\n");
            prompt.push_str(truncate_chars(self.text, self.max_chars));
            prompt.push_str("\n---\n\n");
        }

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

const CLASSIFY_INSTRUCTIONS: &str = r#"Analyze the following document and classify it.
Provide:
1. A topic category of one to three words (for example "Machine Learning", "Healthcare", "Finance")
2. A brief summary of the document
3. The key entities mentioned in the document
4. Your confidence in the topic, between 0.0 and 1.0

Rules:
- Use a general category, not the document title
- Use the same wording for documents about the same subject"#;

const METADATA_ONLY_NOTE: &str = "No text could be extracted from this document. \
Classify it from the file name and metadata above, and lower your confidence accordingly.";

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "topic": "Topic Category",
  "summary": "Brief summary",
  "entities": ["Entity One", "Entity Two"],
  "confidence": 0.0-1.0
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
