//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/generate` endpoint
//! - Per-request timeout taken from the [`CompletionRequest`]
//! - Optional JSON mode (`"format": "json"`)
//! - Health check against `/api/tags`
//!
//! Retries are handled by the analyzer.
//!
//! # Examples
//!
//! ```no_run
//! use pdfsorter_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OllamaProvider::new("http://localhost:11434")?;
//! let health = provider.health_check("llama3.2").await?;
//! println!("model installed: {}", health.model_available);
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use pdfsorter_domain::{CompletionRequest, ModelClient, ModelError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Timeout for health checks and model listing
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Ollama API client for local LLM inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    client: reqwest::Client,
    json_mode: bool,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response from Ollama tags API
#[derive(Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

/// Result of a health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    /// Endpoint that was checked
    pub endpoint: String,

    /// Models installed on the server
    pub models: Vec<String>,

    /// Whether the requested model is among them
    pub model_available: bool,
}

impl OllamaProvider {
    /// Create a new Ollama client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
            json_mode: true,
        })
    }

    /// Create a client for `http://localhost:11434`
    pub fn default_endpoint() -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// Enable or disable Ollama's JSON output mode
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    /// Endpoint without trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List models installed on the server
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LlmError::Communication(format!("HTTP {}", response.status())));
        }

        let tags = response
            .json::<OllamaTagsResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse tags: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check that the server answers and whether `model` is installed
    ///
    /// A model named `llama3.2` matches an installed `llama3.2:latest`.
    pub async fn health_check(&self, model: &str) -> Result<HealthStatus, LlmError> {
        let models = self.list_models().await?;
        let model_available = models
            .iter()
            .any(|name| name == model || name.split(':').next() == Some(model));

        Ok(HealthStatus {
            endpoint: self.endpoint.clone(),
            models,
            model_available,
        })
    }
}

#[async_trait]
impl ModelClient for OllamaProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        let url = format!("{}/api/generate", self.endpoint);

        let body = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
            format: self.json_mode.then_some("json"),
        };

        debug!("POST {} (prompt {} chars)", url, request.prompt.len());

        let response = self
            .client
            .post(&url)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, request.timeout))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ModelError::Unavailable(format!(
                "Model not available: {}",
                request.model
            )));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Unavailable(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| classify_transport_error(e, request.timeout))?;

        Ok(parsed.response)
    }
}

fn classify_transport_error(error: reqwest::Error, timeout: Duration) -> ModelError {
    if error.is_timeout() {
        ModelError::Timeout(timeout)
    } else {
        ModelError::Unavailable(format!("Request failed: {}", error))
    }
}
