use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::cache::CacheError;
use crate::model::BackendError;

/// Failures of a single summarize request
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Text was empty after trimming; nothing was read or generated
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tokenization or generation failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The result cache could not be read or written
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl SummarizeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Backend(_) | Self::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Message safe to return to the caller
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidInput(detail) => detail.clone(),
            Self::Backend(_) | Self::Cache(_) => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for SummarizeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "summarize request failed");
        }
        let body = Json(serde_json::json!({ "detail": self.client_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_client_error() {
        let err = SummarizeError::InvalidInput("Empty text".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Empty text");
    }

    #[test]
    fn backend_and_cache_failures_hide_cause() {
        let backend: SummarizeError = BackendError::Generation("CUDA out of memory".to_string()).into();
        assert_eq!(backend.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(backend.client_message(), "Internal Server Error");

        let cache: SummarizeError = CacheError::Backend("connection refused".to_string()).into();
        assert_eq!(cache.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!cache.client_message().contains("refused"));
    }

    #[test]
    fn display_keeps_underlying_cause() {
        let err: SummarizeError = CacheError::Backend("GET failed: timeout".to_string()).into();
        assert_eq!(err.to_string(), "cache backend: GET failed: timeout");
    }
}
