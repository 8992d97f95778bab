use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::llm::LlmError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    FetchError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("Request processing timed out")]
    Timeout,

    #[error("{0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::FetchError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::LlmError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status: 401 | 403, .. } => {
                AppError::Unauthorized("Invalid API key".to_string())
            }
            LlmError::Api { status: 429, message } => {
                AppError::RateLimited(format!("Rate limited by the summarization service: {}", message))
            }
            other => AppError::LlmError(format!("Failed to generate summary: {}", other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
