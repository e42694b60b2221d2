//! Parse model output into a classification
//!
//! Models wrap JSON in markdown fences, surround it with prose, or ignore the
//! requested format altogether. Parsing never fails: anything that is not a
//! well-shaped JSON object falls back to a heuristic reading of the text.

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Confidence assumed when a structured answer omits it or gives a bad value
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Confidence assigned to heuristic parses
pub const HEURISTIC_CONFIDENCE: f64 = 0.4;

/// Result of parsing one model response
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// Well-formed JSON object with a validated shape
    Structured {
        /// Raw topic (trimmed, non-empty)
        topic: String,
        /// Summary text (may be empty)
        summary: String,
        /// Entities in the order given by the model
        entities: Vec<String>,
        /// Confidence in `[0.0, 1.0]`
        confidence: f64,
    },

    /// Free-form text; first line read as topic
    Heuristic {
        /// Topic taken from the first non-empty line (may be empty)
        topic: String,
        /// Remaining lines joined with spaces
        summary: String,
    },
}

impl ParsedResponse {
    /// Topic carried by either variant
    pub fn topic(&self) -> &str {
        match self {
            ParsedResponse::Structured { topic, .. } | ParsedResponse::Heuristic { topic, .. } => {
                topic
            }
        }
    }

    /// Whether the response was a valid JSON object
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedResponse::Structured { .. })
    }
}

/// Parse a model response
pub fn parse_response(response: &str) -> ParsedResponse {
    let cleaned = strip_code_fence(response);

    if let Some(json_str) = find_json_object(cleaned) {
        match serde_json::from_str::<Value>(json_str) {
            Ok(Value::Object(obj)) => {
                return match structured_from(&obj) {
                    Ok(parsed) => parsed,
                    Err(reason) => {
                        debug!("JSON object rejected: {}", reason);
                        ParsedResponse::Heuristic {
                            topic: String::new(),
                            summary: obj
                                .get("summary")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .trim()
                                .to_string(),
                        }
                    }
                };
            }
            Ok(_) => debug!("Response JSON is not an object"),
            Err(e) => debug!("Response JSON does not parse: {}", e),
        }
    }

    heuristic(cleaned)
}

/// Strip a surrounding markdown code block, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Skip the opening line (``` or ```json) and a closing ``` if present
    let body = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => "",
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Outermost `{ ... }` span
fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn structured_from(obj: &Map<String, Value>) -> Result<ParsedResponse, String> {
    let topic = match obj.get("topic") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return Err("'topic' must be a non-empty string".to_string()),
    };

    let summary = match obj.get("summary") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err("'summary' must be a string".to_string()),
    };

    let entities = match obj.get("entities") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(_) => return Err("'entities' must be an array".to_string()),
    };

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| (0.0..=1.0).contains(c))
        .unwrap_or(DEFAULT_CONFIDENCE);

    Ok(ParsedResponse::Structured {
        topic,
        summary,
        entities,
        confidence,
    })
}

fn heuristic(text: &str) -> ParsedResponse {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"));

    let topic = lines.next().map(clean_topic_line).unwrap_or_default();
    let summary = lines
        .map(|line| strip_label(line, "summary"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    ParsedResponse::Heuristic { topic, summary }
}

/// Remove list/heading markers, numbering and a `Topic:` label
fn clean_topic_line(line: &str) -> String {
    let line = line.trim_start_matches(|c: char| {
        matches!(c, '#' | '-' | '*' | '•' | '>') || c.is_whitespace()
    });

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let line = if digits > 0 {
        let rest = &line[digits..];
        rest.strip_prefix('.')
            .or_else(|| rest.strip_prefix(')'))
            .unwrap_or(line)
    } else {
        line
    };

    strip_label(line, "topic")
        .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '`') || c.is_whitespace())
        .to_string()
}

/// Strip a leading `label:` (ASCII case-insensitive)
fn strip_label<'a>(line: &'a str, label: &str) -> &'a str {
    let trimmed = line.trim_start();
    match trimmed.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => {
            let rest = trimmed[label.len()..].trim_start_matches('*').trim_start();
            match rest.strip_prefix(':') {
                Some(value) => value.trim(),
                None => trimmed.trim_end(),
            }
        }
        _ => trimmed.trim_end(),
    }
}

/// Cap a summary at `max_words` words and `max_chars` characters
pub(crate) fn cap_summary(summary: &str, max_words: usize, max_chars: usize) -> String {
    let mut capped = summary
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ");
    if let Some((idx, _)) = capped.char_indices().nth(max_chars) {
        capped.truncate(idx);
    }
    capped
}

/// Trim, drop empty, deduplicate case-insensitively and cap entities
pub(crate) fn clean_entities(entities: Vec<String>, max_entities: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .filter(|e| seen.insert(e.to_lowercase()))
        .take(max_entities)
        .collect()
}
