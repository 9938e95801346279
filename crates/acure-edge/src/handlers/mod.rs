//! Route handlers.
//!
//! Successful responses use the `{success: true, data}` envelope; failures go
//! through [`EdgeError`](crate::error::EdgeError).

pub mod auth;
pub mod scans;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use acure_core::scan::now_iso8601;

use crate::error::EdgeError;

pub const AVAILABLE_ENDPOINTS: [&str; 5] = [
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/logout",
    "/test",
    "/health",
];

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

pub(crate) fn ok<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(Envelope { success: true, data })).into_response()
}

/// The token of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, EdgeError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| EdgeError::Unauthorized("No token provided".to_string()))
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Acure Scan API is running!",
        "endpoints": {
            "register": "POST /api/auth/register",
            "login": "POST /api/auth/login",
            "logout": "POST /api/auth/logout",
            "verify": "GET /api/auth/verify",
            "scans": "GET|POST /api/scans",
            "scan": "GET|DELETE /api/scans/{id}",
            "test": "GET /test",
            "health": "GET /health"
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK", "timestamp": now_iso8601() }))
}

pub async fn smoke_test() -> impl IntoResponse {
    Json(json!({ "message": "API is working!", "timestamp": now_iso8601() }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "available_endpoints": AVAILABLE_ENDPOINTS
        })),
    )
}
