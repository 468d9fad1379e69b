//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
///
/// Cache-storage problems never surface here; they are logged and absorbed
/// at the call site. The only failure a client ever sees is the terminal
/// "both origin and fallback unavailable" state.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The origin could not be reached
    #[error("Upstream fetch failed: {0}")]
    UpstreamUnavailable(String),

    /// The origin was unreachable and no fallback image is cached
    #[error("No fallback image available")]
    FallbackUnavailable,

    /// Malformed inbound request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal proxy error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ProxyError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ProxyError::FallbackUnavailable => (StatusCode::BAD_GATEWAY, self.to_string()),
            ProxyError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ProxyError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
