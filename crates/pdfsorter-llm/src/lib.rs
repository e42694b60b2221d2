//! pdfsorter Model Clients
//!
//! Implementations of the `ModelClient` trait from `pdfsorter-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use pdfsorter_llm::MockProvider;
//! use pdfsorter_domain::{CompletionRequest, ModelClient};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new(r#"{"topic": "Finance"}"#);
//! let request = CompletionRequest {
//!     prompt: "classify this".to_string(),
//!     model: "llama3.2".to_string(),
//!     temperature: 0.3,
//!     timeout: Duration::from_secs(5),
//! };
//! let result = provider.complete(&request).await.unwrap();
//! assert_eq!(result, r#"{"topic": "Finance"}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use pdfsorter_domain::{CompletionRequest, ModelClient, ModelError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use ollama::{HealthStatus, OllamaProvider};

/// Errors from client construction and health checks
///
/// Completion failures use [`ModelError`] so the analyzer can classify them.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be built
    #[error("Client error: {0}")]
    Client(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(ModelError),
}

/// Mock model client for deterministic testing
///
/// Returns pre-configured responses without any network calls. Replies are
/// chosen by the first registered needle contained in the prompt, falling back
/// to the default reply. The mock also records how many calls were in flight
/// at once, which lets tests observe batch throttling.
///
/// # Examples
///
/// ```
/// use pdfsorter_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("Healthcare", r#"{"topic": "Healthcare"}"#);
/// provider.add_response("neural network", r#"{"topic": "Machine Learning"}"#);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    queued_failures: Arc<Mutex<VecDeque<ModelError>>>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Duration,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// Create a MockProvider that fails every call with the given error
    pub fn failing(error: ModelError) -> Self {
        Self::with_default(MockReply::Error(error))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            responses: Arc::new(Mutex::new(Vec::new())),
            queued_failures: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Reply with `response` to every prompt containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail every prompt containing `needle` with `error`
    pub fn add_error(&mut self, needle: impl Into<String>, error: ModelError) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((needle.into(), MockReply::Error(error)));
    }

    /// Fail the next `count` calls with `error`, whatever the prompt
    pub fn fail_next(&self, count: usize, error: ModelError) {
        let mut queue = self
            .queued_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for _ in 0..count {
            queue.push_back(error.clone());
        }
    }

    /// Hold every call for `delay` before replying
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completed or in-progress calls
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Highest number of calls observed in flight at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn reply_for(&self, prompt: &str) -> Result<String, ModelError> {
        if let Some(error) = self
            .queued_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            return Err(error);
        }

        let responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        let reply = responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .unwrap_or(&self.default_reply);

        match reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Error(error) => Err(error.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ModelClient for MockProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self.reply_for(&request.prompt);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: prompt.to_string(),
            model: "test".to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any prompt")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("say hello")).await.unwrap(), "world");
        assert_eq!(provider.complete(&request("foo!")).await.unwrap(), "bar");
        assert_eq!(
            provider.complete(&request("unknown")).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("prompt1")).await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.complete(&request("prompt2")).await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", ModelError::Unavailable("down".into()));

        let result = provider.complete(&request("a bad prompt")).await;
        assert!(matches!(result, Err(ModelError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_queued_failures() {
        let provider = MockProvider::new("ok");
        provider.fail_next(2, ModelError::Timeout(Duration::from_secs(1)));

        assert!(provider.complete(&request("p")).await.is_err());
        assert!(provider.complete(&request("p")).await.is_err());
        assert_eq!(provider.complete(&request("p")).await.unwrap(), "ok");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_provider_failing() {
        let provider = MockProvider::failing(ModelError::Unavailable("offline".into()));
        assert!(provider.complete(&request("p")).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_provider_tracks_concurrency() {
        let provider = MockProvider::new("ok").with_delay(Duration::from_millis(20));
        let r1 = request("a");
        let r2 = request("b");
        let r3 = request("c");

        let (a, b, c) = tokio::join!(
            provider.complete(&r1),
            provider.complete(&r2),
            provider.complete(&r3)
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(provider.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("test")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
