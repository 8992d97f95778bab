mod mocks;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use groq_summarizer::api::models::SummarizeRequest;
use groq_summarizer::api::routes::{health_handler, summarize_handler};
use groq_summarizer::config::Config;
use groq_summarizer::error::AppError;
use groq_summarizer::AppState;
use mocks::{loader::MockLoader, summarizer::MockSummarizer};

fn config(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn state(config: Config, loader: MockLoader, summarizer: MockSummarizer) -> AppState {
    AppState::new(config, Arc::new(loader), Arc::new(summarizer))
}

fn request(key: Option<&str>, url: &str) -> SummarizeRequest {
    SummarizeRequest {
        groq_api_key: key.map(str::to_string),
        url: url.to_string(),
        max_length: None,
    }
}

async fn summarize(state: &AppState, req: SummarizeRequest) -> Result<String, AppError> {
    summarize_handler(State(state.clone()), Json(req))
        .await
        .map(|Json(body)| body.summary)
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_healthy() {
    let Json(body) = health_handler().await;
    assert_eq!(body.status, "healthy");
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_call_returns_non_empty_summary() {
    let loader = MockLoader::new("Tokio is an asynchronous runtime for Rust.");
    let summarizer = MockSummarizer::new("  Tokio runs async Rust code.  ");
    let loader_calls = loader.calls.clone();
    let summarizer_calls = summarizer.calls.clone();
    let state = state(config(&[]), loader, summarizer);

    let summary = summarize(&state, request(Some("gsk_live"), "https://tokio.rs/tokio/tutorial"))
        .await
        .expect("summarize should succeed");

    assert_eq!(summary, "Tokio runs async Rust code.");
    assert_eq!(loader_calls.lock().unwrap().as_slice(), ["https://tokio.rs/tokio/tutorial"]);

    let calls = summarizer_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, "gsk_live");
    assert!(calls[0].prompt.contains("in 300 words"));
    assert!(calls[0].prompt.contains("**Title:** Mock Page"));
    assert!(calls[0].prompt.contains("Tokio is an asynchronous runtime for Rust."));
}

#[tokio::test]
async fn test_request_length_limit_reaches_prompt() {
    let summarizer = MockSummarizer::new("short");
    let calls = summarizer.calls.clone();
    let state = state(config(&[("MAX_SUMMARY_LENGTH", "200")]), MockLoader::new("text"), summarizer);

    let mut req = request(Some("k"), "https://example.com");
    req.max_length = Some(50);
    summarize(&state, req).await.unwrap();

    assert!(calls.lock().unwrap()[0].prompt.contains("in 50 words"));
}

#[tokio::test]
async fn test_environment_key_is_used_when_request_has_none() {
    let summarizer = MockSummarizer::new("summary");
    let calls = summarizer.calls.clone();
    let state = state(config(&[("GROQ_API_KEY", "gsk_env")]), MockLoader::new("text"), summarizer);

    summarize(&state, request(None, "https://example.com")).await.unwrap();

    assert_eq!(calls.lock().unwrap()[0].api_key, "gsk_env");
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_api_key_is_rejected() {
    let loader = MockLoader::new("text");
    let loader_calls = loader.calls.clone();
    let state = state(config(&[]), loader, MockSummarizer::new("summary"));

    let err = summarize(&state, request(None, "https://example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API Key is required");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    assert!(loader_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_url_is_rejected() {
    let loader = MockLoader::new("text");
    let summarizer = MockSummarizer::new("summary");
    let loader_calls = loader.calls.clone();
    let summarizer_calls = summarizer.calls.clone();
    let state = state(config(&[]), loader, summarizer);

    for url in ["htp:/broken", "just some words", "https://nodot"] {
        let err = summarize(&state, request(Some("k"), url)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL provided", "{}", url);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    assert!(loader_calls.lock().unwrap().is_empty());
    assert!(summarizer_calls.lock().unwrap().is_empty());
}

// ─── Failure mapping ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_content_failure_maps_to_bad_request() {
    let summarizer = MockSummarizer::new("summary");
    let summarizer_calls = summarizer.calls.clone();
    let state = state(
        config(&[]),
        MockLoader::failing("Failed to load content: connection refused"),
        summarizer,
    );

    let err = summarize(&state, request(Some("k"), "https://example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to load content: connection refused");
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    assert!(summarizer_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_content_is_not_sent_to_the_model() {
    let summarizer = MockSummarizer::new("summary");
    let summarizer_calls = summarizer.calls.clone();
    let state = state(config(&[]), MockLoader::new("   \n  "), summarizer);

    let err = summarize(&state, request(Some("k"), "https://example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No content could be extracted from the URL");
    assert!(summarizer_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_api_key_maps_to_unauthorized() {
    let state = state(config(&[]), MockLoader::new("text"), MockSummarizer::failing(401));

    let err = summarize(&state, request(Some("gsk_wrong"), "https://example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_server_error() {
    let state = state(config(&[]), MockLoader::new("text"), MockSummarizer::failing(503));

    let err = summarize(&state, request(Some("k"), "https://example.com"))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Failed to generate summary"));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_empty_summary_is_an_error() {
    let state = state(config(&[]), MockLoader::new("text"), MockSummarizer::new("   "));

    let err = summarize(&state, request(Some("k"), "https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::LlmError(_)));
}

#[tokio::test]
async fn test_slow_summarizer_times_out() {
    let state = state(
        config(&[("REQUEST_TIMEOUT_SECS", "1")]),
        MockLoader::new("text"),
        MockSummarizer::slow("late", Duration::from_secs(5)),
    );

    let err = summarize(&state, request(Some("k"), "https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Timeout));
    assert_eq!(err.into_response().status(), StatusCode::REQUEST_TIMEOUT);
}

// ─── Caching ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cache_serves_repeat_requests_when_enabled() {
    let loader = MockLoader::new("text");
    let summarizer = MockSummarizer::new("cached summary");
    let loader_calls = loader.calls.clone();
    let summarizer_calls = summarizer.calls.clone();
    let state = state(config(&[("ENABLE_CACHE", "true")]), loader, summarizer);

    let first = summarize(&state, request(Some("k"), "https://example.com/a")).await.unwrap();
    let second = summarize(&state, request(Some("k"), "https://example.com/a")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(loader_calls.lock().unwrap().len(), 1);
    assert_eq!(summarizer_calls.lock().unwrap().len(), 1);
    assert_eq!(state.cache.as_ref().map(|cache| cache.len()), Some(1));
}

#[tokio::test]
async fn test_cache_is_off_by_default() {
    let summarizer = MockSummarizer::new("summary");
    let summarizer_calls = summarizer.calls.clone();
    let state = state(config(&[]), MockLoader::new("text"), summarizer);

    summarize(&state, request(Some("k"), "https://example.com/a")).await.unwrap();
    summarize(&state, request(Some("k"), "https://example.com/a")).await.unwrap();

    assert!(state.cache.is_none());
    assert_eq!(summarizer_calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cached_summary_is_not_served_to_another_key() {
    let summarizer = MockSummarizer::new("paid summary");
    let summarizer_calls = summarizer.calls.clone();
    let state = state(config(&[("ENABLE_CACHE", "true")]), MockLoader::new("text"), summarizer);

    summarize(&state, request(Some("gsk_real"), "https://example.com/a")).await.unwrap();
    summarize(&state, request(Some("gsk_other"), "https://example.com/a")).await.unwrap();

    let calls = summarizer_calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].api_key, "gsk_other");
}

#[tokio::test]
async fn test_made_up_key_is_still_rejected_after_caching() {
    let loader = MockLoader::new("text");
    let state_ok = state(config(&[("ENABLE_CACHE", "true")]), loader.clone(), MockSummarizer::new("s"));
    summarize(&state_ok, request(Some("gsk_real"), "https://example.com/a")).await.unwrap();

    // Same cache, provider now rejecting the key.
    let state_reject = AppState {
        summarizer: Arc::new(MockSummarizer::failing(401)),
        ..state_ok.clone()
    };
    let err = summarize(&state_reject, request(Some("gsk_fake"), "https://example.com/a"))
        .await
        .unwrap_err();

    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let loader = MockLoader::failing("Failed to load content: 404");
    let loader_calls = loader.calls.clone();
    let state = state(config(&[("ENABLE_CACHE", "true")]), loader, MockSummarizer::new("s"));

    assert!(summarize(&state, request(Some("k"), "https://example.com")).await.is_err());
    assert!(summarize(&state, request(Some("k"), "https://example.com")).await.is_err());

    assert_eq!(loader_calls.lock().unwrap().len(), 2);
}
