use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::error::{Result, AppError};
use crate::api::models::{HealthResponse, SummarizeRequest, SummarizeResponse, ValidatedRequest};
use crate::cache::CacheKey;
use crate::llm::build_prompt;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(summarize_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

#[tracing::instrument(skip_all, fields(url = %req.url.trim()))]
pub async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>> {
    let start_time = std::time::Instant::now();
    let validated = req.validate(&state.config)?;

    let result = tokio::time::timeout(
        state.config.request_timeout,
        process_summarize_request(&state, &validated),
    )
    .await;

    let elapsed = start_time.elapsed();

    match result {
        Ok(Ok(summary)) => {
            tracing::info!(?elapsed, bytes = summary.len(), "Summary generated");
            Ok(Json(SummarizeResponse { summary }))
        }
        Ok(Err(err)) => {
            tracing::warn!(?elapsed, error = %err, status = %err.status_code(), "Summarization failed");
            Err(err)
        }
        Err(_) => {
            tracing::warn!(?elapsed, "Request timed out");
            Err(AppError::Timeout)
        }
    }
}

async fn process_summarize_request(state: &AppState, req: &ValidatedRequest) -> Result<String> {
    let cache_key = CacheKey::new(req.url.as_str(), req.max_length, &req.api_key);

    if let Some(cache) = &state.cache {
        if let Some(summary) = cache.get(&cache_key) {
            tracing::info!("Cache hit");
            return Ok(summary);
        }
    }

    let fetch_start = std::time::Instant::now();
    let docs = state.loader.load(&req.url).await?;
    if docs.iter().all(|doc| doc.content.trim().is_empty()) {
        return Err(AppError::FetchError(crate::content::NO_CONTENT.to_string()));
    }
    let sources: Vec<&str> = docs.iter().map(|doc| doc.source.as_str()).collect();
    tracing::debug!(?sources, elapsed = ?fetch_start.elapsed(), "Content loaded");

    let prompt = build_prompt(&docs, req.max_length, state.config.max_content_chars);
    tracing::debug!(prompt_bytes = prompt.len(), "Built prompt");

    let llm_start = std::time::Instant::now();
    let summary = state.summarizer.summarize(&req.api_key, &prompt).await?;
    tracing::debug!(elapsed = ?llm_start.elapsed(), "LLM call finished");

    let summary = summary.trim().to_string();
    if summary.is_empty() {
        return Err(AppError::LlmError(
            "Failed to generate summary: the model returned an empty summary".to_string(),
        ));
    }

    if let Some(cache) = &state.cache {
        cache.insert(cache_key, summary.clone());
    }

    Ok(summary)
}
