use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failure of a call to Identity Toolkit or Firestore.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The upstream answered with a non-success status. `message` is the
    /// upstream error code when it sent one, otherwise the raw body.
    #[error("Upstream rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Upstream unreachable: {0}")]
    Transport(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::Rejected { status: 404, .. })
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum EdgeError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Unauthorized access")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    /// Upstream failure surfaced with its own error text.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    #[error("Internal server error")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EdgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::BadRequest(_) | EdgeError::MalformedPayload => StatusCode::BAD_REQUEST,
            EdgeError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EdgeError::Forbidden => StatusCode::FORBIDDEN,
            EdgeError::NotFound(_) => StatusCode::NOT_FOUND,
            EdgeError::Upstream { .. } | EdgeError::Internal(_) | EdgeError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for EdgeError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection);
        EdgeError::MalformedPayload
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();

        let (message, details) = match self {
            EdgeError::Internal(message) => {
                tracing::error!("Request failed: {}", message);
                (Some(message), None)
            }
            EdgeError::Upstream { details, .. } => (None, details),
            _ => (None, None),
        };

        let body = ErrorBody {
            success: false,
            error,
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
