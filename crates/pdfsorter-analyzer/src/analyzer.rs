//! Core Analyzer implementation

use crate::config::{AnalyzerConfig, MAX_SUMMARY_CHARS};
use crate::error::AnalyzerError;
use crate::parser::{cap_summary, clean_entities, parse_response, ParsedResponse, HEURISTIC_CONFIDENCE};
use crate::prompt::PromptBuilder;
use crate::retry::with_retry;
use pdfsorter_domain::{CompletionRequest, Document, Judgment, ModelClient, ModelError, ParseKind};
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Analyzer turns a document into a judgment with a language model
pub struct Analyzer<M: ModelClient> {
    client: Arc<M>,
    config: Arc<AnalyzerConfig>,
}

impl<M: ModelClient> Clone for Analyzer<M> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: Arc::clone(&self.config),
        }
    }
}

impl<M: ModelClient> Analyzer<M> {
    /// Create a new Analyzer
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Config`] if the configuration is invalid.
    pub fn new(client: M, config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        Self::with_shared_client(Arc::new(client), config)
    }

    /// Create an Analyzer around a client that is shared with other owners
    pub fn with_shared_client(client: Arc<M>, config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate().map_err(AnalyzerError::Config)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify one document
    ///
    /// Never fails: problems are reported through the judgment's status.
    pub async fn analyze(&self, document: &Document) -> Judgment {
        let path = document.path();

        if !document.has_text() && document.title().is_none() {
            warn!("No extractable text or title in {:?}", path);
            return Judgment::extraction_failed(path, "no extractable text");
        }

        let builder = PromptBuilder::new(document, &self.config);
        if builder.is_metadata_only() {
            debug!("Classifying {:?} from metadata only", path);
        }
        let request = CompletionRequest {
            prompt: builder.build(),
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            timeout: self.config.call_timeout(),
        };
        debug!("Prompt length for {:?}: {} chars", path, request.prompt.len());

        let label = format!("Analysis of {}", document.file_name());
        let request = &request;
        let response = with_retry(&self.config.retry, &label, move || self.call_model(request)).await;

        match response {
            Ok(text) => {
                debug!("Response length for {:?}: {} chars", path, text.len());
                let judgment = self.judge(path, &text);
                info!(
                    "Classified {:?} as '{}' ({:.2})",
                    path,
                    judgment.topic(),
                    judgment.confidence()
                );
                judgment
            }
            Err(e) => {
                warn!("Model failed for {:?}: {}", path, e);
                Judgment::model_failed(path, e.kind(), e.to_string())
            }
        }
    }

    /// One model call bounded by the per-call timeout
    async fn call_model(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        timeout(request.timeout, self.client.complete(request))
            .await
            .map_err(|_| ModelError::Timeout(request.timeout))?
    }

    fn judge(&self, path: &Path, response: &str) -> Judgment {
        let words = self.config.summary_words;
        match parse_response(response) {
            ParsedResponse::Structured {
                topic,
                summary,
                entities,
                confidence,
            } => Judgment::success(
                path,
                topic,
                cap_summary(&summary, words, MAX_SUMMARY_CHARS),
                clean_entities(entities, self.config.max_entities),
                confidence,
                ParseKind::Structured,
            ),
            ParsedResponse::Heuristic { topic, summary } => {
                debug!("Heuristic parse for {:?}", path);
                Judgment::success(
                    path,
                    topic,
                    cap_summary(&summary, words, MAX_SUMMARY_CHARS),
                    Vec::new(),
                    HEURISTIC_CONFIDENCE,
                    ParseKind::Heuristic,
                )
            }
        }
    }
}
