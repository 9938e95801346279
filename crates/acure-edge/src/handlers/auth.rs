use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{bearer_token, ok};
use crate::error::{EdgeError, UpstreamError};
use crate::identity::{login_message, register_message};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct Registered {
    uid: String,
    email: String,
    name: String,
    token: String,
}

#[derive(Serialize)]
struct SignedIn {
    uid: String,
    email: String,
    token: String,
}

#[derive(Serialize)]
struct Verified {
    uid: String,
    email: String,
}

fn rejected_code(err: &UpstreamError) -> &str {
    match err {
        UpstreamError::Rejected { message, .. } => message,
        UpstreamError::Transport(_) => "",
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<Response, EdgeError> {
    let Json(body) = payload?;

    let account = state
        .identity
        .sign_up(&body.email, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!("Registration failed: {}", e);
            EdgeError::BadRequest(register_message(rejected_code(&e)).to_string())
        })?;

    tracing::info!("Registered account {}", account.local_id);
    Ok(ok(
        StatusCode::CREATED,
        Registered {
            uid: account.local_id,
            email: account.email,
            name: body.name,
            token: account.id_token,
        },
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Response, EdgeError> {
    let Json(body) = payload?;

    let account = state
        .identity
        .sign_in(&body.email, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!("Login failed: {}", e);
            EdgeError::Unauthorized(login_message(rejected_code(&e)).to_string())
        })?;

    tracing::info!("Signed in {}", account.local_id);
    Ok(ok(
        StatusCode::OK,
        SignedIn {
            uid: account.local_id,
            email: account.email,
            token: account.id_token,
        },
    ))
}

/// Tokens are stateless, so there is nothing to revoke here.
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "success": true, "message": "Logout successful" }))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, EdgeError> {
    let token = bearer_token(&headers)?;

    let user = state.identity.lookup(token).await.map_err(|e| match e {
        UpstreamError::Rejected { message, .. } if !message.is_empty() => {
            EdgeError::Unauthorized(message)
        }
        UpstreamError::Rejected { .. } => {
            EdgeError::Unauthorized("Token verification failed".to_string())
        }
        UpstreamError::Transport(message) => EdgeError::Internal(message),
    })?;

    Ok(ok(
        StatusCode::OK,
        Verified {
            uid: user.local_id,
            email: user.email,
        },
    ))
}
