use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

pub const INVALID_CPF_MESSAGE: &str = "CPF inválido: deve conter 11 dígitos";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const UPSTREAM_TIMEOUT_MESSAGE: &str = "Timeout ao consultar API externa";
pub const UPSTREAM_TRANSPORT_MESSAGE: &str = "Erro ao conectar com API externa";
pub const UPSTREAM_MALFORMED_MESSAGE: &str = "Erro ao processar resposta da API externa";

/// Maximum number of characters of a non-JSON upstream body echoed back.
pub const RAW_EXCERPT_CHARS: usize = 200;

/// Application-specific error types.
///
/// Every variant is converted into exactly one JSON response at the handler
/// boundary; nothing escapes to the server as an unhandled fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Request method other than GET or OPTIONS.
    MethodNotAllowed,
    /// CPF did not normalize to 11 digits. Carries the normalized value.
    InvalidCpf { received: String },
    /// The consult API did not answer before the deadline.
    UpstreamTimeout,
    /// Any other failure reaching or reading the consult API.
    UpstreamTransport(String),
    /// The consult API answered with a body that is not JSON.
    UpstreamMalformedResponse { raw: String },
}

impl AppError {
    /// Builds an `UpstreamMalformedResponse` keeping only the first
    /// [`RAW_EXCERPT_CHARS`] characters of the body.
    pub fn malformed_response(body: &str) -> Self {
        AppError::UpstreamMalformedResponse {
            raw: body.chars().take(RAW_EXCERPT_CHARS).collect(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InvalidCpf { .. } => StatusCode::BAD_REQUEST,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::UpstreamTransport(_) | AppError::UpstreamMalformedResponse { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MethodNotAllowed => write!(f, "{}", METHOD_NOT_ALLOWED_MESSAGE),
            AppError::InvalidCpf { received } => {
                write!(f, "Invalid CPF (received '{}')", received)
            }
            AppError::UpstreamTimeout => write!(f, "Consult API timed out"),
            AppError::UpstreamTransport(msg) => write!(f, "Consult API transport error: {}", msg),
            AppError::UpstreamMalformedResponse { raw } => {
                write!(f, "Consult API returned non-JSON body: {}", raw)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each variant to its status code and JSON body, logging upstream
    /// faults at error level and client mistakes at warn level.
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::MethodNotAllowed => {
                tracing::warn!("Rejected request with unsupported method");
                json!({ "error": METHOD_NOT_ALLOWED_MESSAGE })
            }
            AppError::InvalidCpf { received } => {
                tracing::warn!("Invalid CPF: '{}'", received);
                json!({
                    "success": false,
                    "error": INVALID_CPF_MESSAGE,
                    "received": received,
                })
            }
            AppError::UpstreamTimeout => {
                tracing::error!("Consult API request timed out");
                json!({
                    "success": false,
                    "error": UPSTREAM_TIMEOUT_MESSAGE,
                })
            }
            AppError::UpstreamTransport(detail) => {
                tracing::error!("Consult API request failed: {}", detail);
                json!({
                    "success": false,
                    "error": UPSTREAM_TRANSPORT_MESSAGE,
                    "detail": detail,
                })
            }
            AppError::UpstreamMalformedResponse { raw } => {
                tracing::error!("Failed to parse consult API response: {}", raw);
                json!({
                    "success": false,
                    "error": UPSTREAM_MALFORMED_MESSAGE,
                    "raw": raw,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Timeouts reported by reqwest itself count as deadline expiry; everything
    /// else is a transport failure.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::UpstreamTimeout
        } else {
            AppError::UpstreamTransport(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::UpstreamTimeout
    }
}
