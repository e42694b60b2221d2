//! Judgment module - the per-document classification result

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reserved folder (and topic) for documents that could not be classified
pub const FALLBACK_FOLDER: &str = "Unsorted";

/// Outcome of analyzing one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgmentStatus {
    /// The model produced a usable classification
    Success,

    /// Text extraction failed
    ExtractionFailed,

    /// The model failed after all retries
    ModelFailed,

    /// The document was not analyzed in this run
    Skipped,
}

/// Failure kinds counted in the report's `failed_by_kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureKind {
    /// Unreadable, corrupted, encrypted or image-only PDF
    ExtractionError,

    /// Model server unreachable
    ModelUnavailableError,

    /// Model call exceeded its budget
    TimeoutError,

    /// Filesystem error while placing the file
    MoveFailed,
}

impl FailureKind {
    /// Name used as the report key
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ExtractionError => "ExtractionError",
            FailureKind::ModelUnavailableError => "ModelUnavailableError",
            FailureKind::TimeoutError => "TimeoutError",
            FailureKind::MoveFailed => "MoveFailed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the model response was turned into a judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseKind {
    /// Well-formed JSON object with a validated shape
    Structured,

    /// Free-form text; first line taken as topic
    Heuristic,
}

/// Classification of one document
///
/// A judgment whose status is not [`JudgmentStatus::Success`] always carries
/// the fallback values: topic [`FALLBACK_FOLDER`], empty summary, no
/// entities and zero confidence. The constructors are the only way to build
/// one, so the invariant cannot be broken from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    source_path: PathBuf,
    topic: String,
    summary: String,
    entities: Vec<String>,
    confidence: f64,
    status: JudgmentStatus,
    failure: Option<FailureKind>,
    error: Option<String>,
    parse: Option<ParseKind>,
}

impl Judgment {
    /// Successful classification
    ///
    /// Confidence is clamped into `[0.0, 1.0]`.
    pub fn success(
        source_path: impl Into<PathBuf>,
        topic: impl Into<String>,
        summary: impl Into<String>,
        entities: Vec<String>,
        confidence: f64,
        parse: ParseKind,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            source_path: source_path.into(),
            topic: topic.into(),
            summary: summary.into(),
            entities,
            confidence,
            status: JudgmentStatus::Success,
            failure: None,
            error: None,
            parse: Some(parse),
        }
    }

    /// Extraction failed before the model was consulted
    pub fn extraction_failed(source_path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::fallback(
            source_path.into(),
            JudgmentStatus::ExtractionFailed,
            Some(FailureKind::ExtractionError),
            Some(detail.into()),
        )
    }

    /// The model failed after all retries
    pub fn model_failed(
        source_path: impl Into<PathBuf>,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self::fallback(
            source_path.into(),
            JudgmentStatus::ModelFailed,
            Some(kind),
            Some(detail.into()),
        )
    }

    /// The document was intentionally not analyzed
    pub fn skipped(source_path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::fallback(
            source_path.into(),
            JudgmentStatus::Skipped,
            None,
            Some(reason.into()),
        )
    }

    fn fallback(
        source_path: PathBuf,
        status: JudgmentStatus,
        failure: Option<FailureKind>,
        error: Option<String>,
    ) -> Self {
        Self {
            source_path,
            topic: FALLBACK_FOLDER.to_string(),
            summary: String::new(),
            entities: Vec::new(),
            confidence: 0.0,
            status,
            failure,
            error,
            parse: None,
        }
    }

    /// Source path of the judged document
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Raw topic as produced by the model (or the fallback topic)
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Summary text
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Key entities in model order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Confidence in `[0.0, 1.0]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Status tag
    pub fn status(&self) -> JudgmentStatus {
        self.status
    }

    /// Whether the judgment carries a usable classification
    pub fn is_success(&self) -> bool {
        self.status == JudgmentStatus::Success
    }

    /// Failure kind for failed judgments
    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// Error or skip detail
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Parse path taken for successful judgments
    pub fn parse(&self) -> Option<ParseKind> {
        self.parse
    }
}
