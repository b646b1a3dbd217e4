//! Integration tests for the catalogue CLI commands

use catalogue_cli::cli::ExtractArgs;
use catalogue_cli::commands::{execute_extract, EXIT_SUCCESS};
use catalogue_cli::{Formatter, OutputFormat};
use catalogue_domain::traits::ModelStore;
use catalogue_domain::CandidateRecord;
use catalogue_extractor::{shared, ErrorKind, Extractor, ExtractorConfig, RetryPolicy, SharedStore};
use catalogue_gatekeeper::Gatekeeper;
use catalogue_llm::{LlmError, MockProvider};
use catalogue_store::SqliteStore;
use std::sync::Arc;

const GPT4_TEXT: &str = "GPT-4 is a large multimodal model released by OpenAI in March 2023.";

fn create_extractor(provider: &MockProvider) -> (Extractor<SqliteStore>, SharedStore<SqliteStore>) {
    let store = shared(SqliteStore::in_memory().unwrap());
    let config = ExtractorConfig {
        retry: RetryPolicy {
            max_retries: 1,
            initial_backoff_ms: 1,
            max_backoff_ms: 1,
            attempt_timeout_ms: 1_000,
        },
        ..ExtractorConfig::default()
    };
    let extractor = Extractor::new(
        Arc::new(provider.clone()),
        store.clone(),
        Gatekeeper::default_config(),
        config,
    );
    (extractor, store)
}

fn text_args(text: &str) -> ExtractArgs {
    ExtractArgs {
        text: Some(text.to_string()),
        file: None,
        stdin: false,
    }
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

fn gpt4_provider() -> MockProvider {
    MockProvider::new(CandidateRecord::named("gpt-4").with_organization("OpenAI"))
}

#[tokio::test]
async fn test_extract_succeeds_and_stores_record() {
    let (extractor, store) = create_extractor(&gpt4_provider());

    let code = execute_extract(text_args(GPT4_TEXT), &extractor, &formatter())
        .await
        .unwrap();
    assert_eq!(code, EXIT_SUCCESS);

    let stored = store.lock().unwrap().find_by_name("gpt-4").unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_duplicate_exit_code() {
    let (extractor, _store) = create_extractor(&gpt4_provider());

    execute_extract(text_args(GPT4_TEXT), &extractor, &formatter())
        .await
        .unwrap();
    let code = execute_extract(text_args(GPT4_TEXT), &extractor, &formatter())
        .await
        .unwrap();
    assert_eq!(code, ErrorKind::DuplicateConflict.exit_code());
}

#[tokio::test]
async fn test_short_text_exit_code() {
    let provider = gpt4_provider();
    let (extractor, _store) = create_extractor(&provider);

    let code = execute_extract(text_args("hi"), &extractor, &formatter())
        .await
        .unwrap();
    assert_eq!(code, ErrorKind::InputError.exit_code());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_nothing_found_exit_code() {
    let (extractor, store) = create_extractor(&MockProvider::not_found());

    let code = execute_extract(
        text_args("It rained all afternoon in the valley."),
        &extractor,
        &Formatter::new(OutputFormat::Text, false),
    )
    .await
    .unwrap();
    assert_eq!(code, ErrorKind::ExtractionEmpty.exit_code());
    assert_eq!(store.lock().unwrap().count().unwrap(), 0);
}

#[tokio::test]
async fn test_service_failure_exit_code() {
    let provider = gpt4_provider();
    provider.push_error(LlmError::Timeout);
    provider.push_error(LlmError::Timeout);
    let (extractor, _store) = create_extractor(&provider);

    let code = execute_extract(text_args(GPT4_TEXT), &extractor, &formatter())
        .await
        .unwrap();
    assert_eq!(code, ErrorKind::ExtractionServiceError.exit_code());
}

#[tokio::test]
async fn test_validation_exit_code() {
    let provider = MockProvider::new(CandidateRecord::named("gpt-4"));
    let (extractor, _store) = create_extractor(&provider);

    let code = execute_extract(text_args(GPT4_TEXT), &extractor, &formatter())
        .await
        .unwrap();
    assert_eq!(code, ErrorKind::ValidationError.exit_code());
}
