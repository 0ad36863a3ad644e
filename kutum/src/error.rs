use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KutumError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    #[error("Vision error: {0}")]
    Vision(String),

    #[error("Vision unavailable: {0}")]
    VisionUnavailable(String),
}

impl KutumError {
    /// Failures of a hosted model. These are recovered locally and never
    /// reach a caller as-is.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            KutumError::Llm(_)
                | KutumError::LlmUnavailable(_)
                | KutumError::LlmRateLimit { .. }
                | KutumError::Vision(_)
                | KutumError::VisionUnavailable(_)
        )
    }
}

impl IntoResponse for KutumError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            KutumError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            KutumError::Llm(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            KutumError::LlmUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            KutumError::LlmRateLimit { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            KutumError::Vision(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            KutumError::VisionUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        }

        let body = Json(json!({
            "detail": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, KutumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_classification() {
        assert!(KutumError::Llm("boom".into()).is_external());
        assert!(KutumError::LlmRateLimit { retry_after: None }.is_external());
        assert!(KutumError::VisionUnavailable("off".into()).is_external());
        assert!(!KutumError::Validation("bad".into()).is_external());
    }

    #[test]
    fn test_model_failures_map_to_gateway_errors() {
        let response = KutumError::Vision("bad image".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = KutumError::LlmRateLimit { retry_after: None }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = KutumError::VisionUnavailable("off".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = KutumError::Validation("Message is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
