//! Scan history handlers.
//!
//! Every route requires a bearer token whose account matches the `userId`
//! the request names. Documents live under `users/{userId}/scans`.

use std::sync::Arc;

use acure_core::scan::{ScanRecord, now_iso8601};
use acure_infrastructure::generate_scan_id;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use super::{bearer_token, ok};
use crate::error::{EdgeError, UpstreamError};
use crate::firestore::{ScanOwner, ScanView, decode_scan, scan_fields};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

impl UserQuery {
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScanBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(flatten)]
    pub scan: ScanRecord,
}

/// Resolves the token and checks it belongs to `user_id`.
async fn verify_owner(state: &AppState, token: &str, user_id: &str) -> Result<(), EdgeError> {
    let user = state.identity.lookup(token).await.map_err(|e| match e {
        UpstreamError::Rejected { .. } => EdgeError::Unauthorized("Invalid token".to_string()),
        UpstreamError::Transport(message) => EdgeError::Internal(message),
    })?;

    if user.local_id != user_id {
        tracing::warn!("Token of {} used for scans of {}", user.local_id, user_id);
        return Err(EdgeError::Forbidden);
    }
    Ok(())
}

pub async fn list_scans(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Response, EdgeError> {
    let user_id = query
        .user_id()
        .ok_or_else(|| EdgeError::BadRequest("User ID is required".to_string()))?;
    let token = bearer_token(&headers)?;
    verify_owner(&state, token, user_id).await?;

    let documents = state.firestore.list_scans(token, user_id).await.map_err(|e| {
        tracing::error!("Firestore list failed: {}", e);
        EdgeError::Internal("Failed to fetch scans from Firestore".to_string())
    })?;

    let scans: Vec<ScanView> = documents.iter().map(|d| decode_scan(d, user_id)).collect();
    tracing::debug!("Listing {} scans for {}", scans.len(), user_id);
    Ok(ok(StatusCode::OK, scans))
}

pub async fn save_scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SaveScanBody>, JsonRejection>,
) -> Result<Response, EdgeError> {
    let token = bearer_token(&headers)?;
    let Json(body) = payload?;
    if body.user_id.is_empty() {
        return Err(EdgeError::BadRequest("User ID is required".to_string()));
    }
    verify_owner(&state, token, &body.user_id).await?;

    let scan_id = generate_scan_id();
    let now = now_iso8601();
    let owner = ScanOwner {
        user_id: body.user_id.clone(),
        email: body.user_email,
        name: body.user_name,
    };
    let fields = scan_fields(&scan_id, &body.scan, &owner, &now);

    state
        .firestore
        .create_scan(token, &body.user_id, &scan_id, fields)
        .await
        .map_err(|e| {
            tracing::error!("Firestore save failed: {}", e);
            let details = match e {
                UpstreamError::Rejected { message, .. } => message,
                UpstreamError::Transport(message) => message,
            };
            EdgeError::Upstream {
                message: "Failed to save scan".to_string(),
                details: Some(details),
            }
        })?;

    tracing::info!("Saved scan {} for {}", scan_id, body.user_id);
    let mut scan = body.scan.with_id(scan_id.clone());
    scan.timestamp = now;
    Ok(ok(
        StatusCode::CREATED,
        ScanView {
            scan,
            scan_id,
            user_id: body.user_id,
        },
    ))
}

fn required_user<'a>(query: &'a UserQuery, scan_id: &str) -> Result<&'a str, EdgeError> {
    match query.user_id() {
        Some(user_id) if !scan_id.is_empty() => Ok(user_id),
        _ => Err(EdgeError::BadRequest(
            "User ID and Scan ID are required".to_string(),
        )),
    }
}

pub async fn get_scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(scan_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Response, EdgeError> {
    let user_id = required_user(&query, &scan_id)?;
    let token = bearer_token(&headers)?;
    verify_owner(&state, token, user_id).await?;

    let document = state
        .firestore
        .get_scan(token, user_id, &scan_id)
        .await
        .map_err(|e| {
            tracing::error!("Firestore get failed: {}", e);
            EdgeError::Upstream {
                message: "Failed to fetch scan".to_string(),
                details: None,
            }
        })?
        .ok_or_else(|| EdgeError::NotFound("Scan not found".to_string()))?;

    Ok(ok(StatusCode::OK, decode_scan(&document, user_id)))
}

pub async fn delete_scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(scan_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Response, EdgeError> {
    let user_id = required_user(&query, &scan_id)?;
    let token = bearer_token(&headers)?;
    verify_owner(&state, token, user_id).await?;

    state
        .firestore
        .delete_scan(token, user_id, &scan_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                return EdgeError::NotFound("Scan not found".to_string());
            }
            tracing::error!("Firestore delete failed: {}", e);
            EdgeError::Upstream {
                message: "Failed to delete scan".to_string(),
                details: None,
            }
        })?;

    tracing::info!("Deleted scan {} for {}", scan_id, user_id);
    Ok(ok(StatusCode::OK, json!({ "id": scan_id, "deleted": true })))
}
