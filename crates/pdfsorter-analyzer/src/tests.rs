//! Integration tests for the Analyzer

#[cfg(test)]
mod tests {
    use crate::{Analyzer, AnalyzerConfig, AnalyzerError, RetryPolicy, HEURISTIC_CONFIDENCE};
    use pdfsorter_domain::{
        Document, ExtractedText, FailureKind, JudgmentStatus, ModelError, ParseKind, FALLBACK_FOLDER,
    };
    use pdfsorter_llm::MockProvider;
    use std::time::Duration;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            retry: RetryPolicy::immediate(3),
            ..Default::default()
        }
    }

    fn document(text: &str) -> Document {
        Document::new(
            "/in/paper.pdf",
            ExtractedText {
                text: text.to_string(),
                page_count: 1,
                size_bytes: 10,
                ..Default::default()
            },
        )
    }

    fn titled_document(title: &str) -> Document {
        Document::new(
            "/in/scan.pdf",
            ExtractedText {
                title: Some(title.to_string()),
                page_count: 1,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_full_analysis_flow() {
        let llm = MockProvider::new(
            r#"{"topic": "Machine Learning", "summary": "Training deep networks with SGD.", "entities": ["SGD", "sgd", "ImageNet"], "confidence": 0.85}"#,
        );
        let analyzer = Analyzer::new(llm.clone(), config()).unwrap();

        let judgment = analyzer.analyze(&document("neural network training")).await;

        assert_eq!(judgment.status(), JudgmentStatus::Success);
        assert_eq!(judgment.topic(), "Machine Learning");
        assert_eq!(judgment.summary(), "Training deep networks with SGD.");
        assert_eq!(judgment.entities(), &["SGD".to_string(), "ImageNet".to_string()]);
        assert_eq!(judgment.confidence(), 0.85);
        assert_eq!(judgment.parse(), Some(ParseKind::Structured));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_free_form_answer_is_heuristic() {
        let llm = MockProvider::new("Healthcare\nA study of hospital readmissions.");
        let analyzer = Analyzer::new(llm, config()).unwrap();

        let judgment = analyzer.analyze(&document("patients")).await;

        assert!(judgment.is_success());
        assert_eq!(judgment.topic(), "Healthcare");
        assert_eq!(judgment.summary(), "A study of hospital readmissions.");
        assert!(judgment.entities().is_empty());
        assert_eq!(judgment.confidence(), HEURISTIC_CONFIDENCE);
        assert_eq!(judgment.parse(), Some(ParseKind::Heuristic));
    }

    #[tokio::test]
    async fn test_summary_is_capped_to_word_budget() {
        let long_summary = vec!["word"; 200].join(" ");
        let llm = MockProvider::new(format!(
            r#"{{"topic": "Linguistics", "summary": "{}"}}"#,
            long_summary
        ));
        let analyzer = Analyzer::new(
            llm,
            AnalyzerConfig {
                summary_words: 10,
                ..config()
            },
        )
        .unwrap();

        let judgment = analyzer.analyze(&document("text")).await;
        assert_eq!(judgment.summary().split_whitespace().count(), 10);
    }

    #[tokio::test]
    async fn test_entities_are_capped() {
        let llm = MockProvider::new(r#"{"topic": "History", "entities": ["A", "B", "C", "D"]}"#);
        let analyzer = Analyzer::new(
            llm,
            AnalyzerConfig {
                max_entities: 2,
                ..config()
            },
        )
        .unwrap();

        let judgment = analyzer.analyze(&document("text")).await;
        assert_eq!(judgment.entities(), &["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_text_without_title_skips_model() {
        let llm = MockProvider::new(r#"{"topic": "Anything"}"#);
        let analyzer = Analyzer::new(llm.clone(), config()).unwrap();

        let judgment = analyzer.analyze(&document("  \n\t ")).await;

        assert_eq!(judgment.status(), JudgmentStatus::ExtractionFailed);
        assert_eq!(judgment.failure(), Some(FailureKind::ExtractionError));
        assert_eq!(judgment.error(), Some("no extractable text"));
        assert_eq!(judgment.topic(), FALLBACK_FOLDER);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_text_with_title_uses_metadata() {
        let mut llm = MockProvider::default();
        llm.add_response("Title: Annual Tax Return", r#"{"topic": "Finance", "confidence": 0.6}"#);
        let analyzer = Analyzer::new(llm.clone(), config()).unwrap();

        let judgment = analyzer.analyze(&titled_document("Annual Tax Return")).await;

        assert!(judgment.is_success());
        assert_eq!(judgment.topic(), "Finance");
        assert_eq!(judgment.confidence(), 0.6);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let llm = MockProvider::new(r#"{"topic": "Physics"}"#);
        llm.fail_next(2, ModelError::Unavailable("connection refused".into()));
        let analyzer = Analyzer::new(llm.clone(), config()).unwrap();

        let judgment = analyzer.analyze(&document("quarks")).await;

        assert!(judgment.is_success());
        assert_eq!(judgment.topic(), "Physics");
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_are_model_failed() {
        let llm = MockProvider::failing(ModelError::Unavailable("connection refused".into()));
        let analyzer = Analyzer::new(llm.clone(), config()).unwrap();

        let judgment = analyzer.analyze(&document("text")).await;

        assert_eq!(judgment.status(), JudgmentStatus::ModelFailed);
        assert_eq!(judgment.failure(), Some(FailureKind::ModelUnavailableError));
        assert_eq!(judgment.topic(), FALLBACK_FOLDER);
        assert!(judgment.summary().is_empty());
        assert!(judgment.entities().is_empty());
        assert_eq!(judgment.confidence(), 0.0);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out() {
        let llm = MockProvider::new(r#"{"topic": "Slow"}"#).with_delay(Duration::from_secs(30));
        let analyzer = Analyzer::new(
            llm.clone(),
            AnalyzerConfig {
                call_timeout_secs: 5,
                retry: RetryPolicy::immediate(2),
                ..Default::default()
            },
        )
        .unwrap();

        let judgment = analyzer.analyze(&document("text")).await;

        assert_eq!(judgment.status(), JudgmentStatus::ModelFailed);
        assert_eq!(judgment.failure(), Some(FailureKind::TimeoutError));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_between_retries() {
        let llm = MockProvider::new(r#"{"topic": "Physics"}"#);
        llm.fail_next(1, ModelError::Timeout(Duration::from_secs(1)));
        let analyzer = Analyzer::new(
            llm,
            AnalyzerConfig {
                retry: RetryPolicy {
                    max_attempts: 2,
                    initial_backoff_ms: 2_000,
                    backoff_multiplier: 2.0,
                    max_backoff_ms: 10_000,
                },
                ..Default::default()
            },
        )
        .unwrap();

        let start = tokio::time::Instant::now();
        let judgment = analyzer.analyze(&document("text")).await;

        assert!(judgment.is_success());
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_empty_answer_is_heuristic_with_empty_topic() {
        let llm = MockProvider::new("");
        let analyzer = Analyzer::new(llm, config()).unwrap();

        let judgment = analyzer.analyze(&document("text")).await;

        assert!(judgment.is_success());
        assert_eq!(judgment.topic(), "");
        assert_eq!(judgment.parse(), Some(ParseKind::Heuristic));
    }

    #[tokio::test]
    async fn test_temperature_and_model_are_passed_through() {
        let mut llm = MockProvider::default();
        llm.add_response("text", r#"{"topic": "Art"}"#);
        let analyzer = Analyzer::new(
            llm,
            AnalyzerConfig {
                model: "mistral".into(),
                temperature: 0.0,
                ..config()
            },
        )
        .unwrap();

        assert_eq!(analyzer.config().model, "mistral");
        assert_eq!(analyzer.config().temperature, 0.0);
        assert!(analyzer.analyze(&document("text")).await.is_success());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Analyzer::new(
            MockProvider::default(),
            AnalyzerConfig {
                temperature: 2.0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }
}
