#![allow(dead_code)]

//! A fake Firebase (Identity Toolkit and Firestore REST) for driving the edge
//! routes end to end.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use acure_edge::{AppState, CorsFallback, EdgeConfig, build_app};
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";
pub const ANA_TOKEN: &str = "token-ana-0123456789";
pub const BOB_TOKEN: &str = "token-bob-0123456789";

/// Scan documents by `(uid, doc id)`.
#[derive(Clone, Default)]
pub struct FakeFirebase {
    pub documents: Arc<Mutex<BTreeMap<(String, String), Map<String, Value>>>>,
}

fn identity_error(code: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": code } })),
    )
        .into_response()
}

fn user_for_token(token: &str) -> Option<(&'static str, &'static str)> {
    match token {
        ANA_TOKEN => Some(("uid-ana", "ana@example.com")),
        BOB_TOKEN => Some(("uid-bob", "bob@example.com")),
        _ => None,
    }
}

async fn accounts(
    Path(method): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return identity_error("API_KEY_INVALID");
    }
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();

    match method.as_str() {
        "accounts:signUp" => {
            if field("email") == "taken@example.com" {
                return identity_error("EMAIL_EXISTS");
            }
            if field("password").len() < 6 {
                return identity_error("WEAK_PASSWORD : Password should be at least 6 characters");
            }
            Json(json!({ "localId": "uid-new", "email": field("email"), "idToken": "token-new" }))
                .into_response()
        }
        "accounts:signInWithPassword" => {
            if field("email") != "ana@example.com" {
                return identity_error("EMAIL_NOT_FOUND");
            }
            if field("password") != "secret1" {
                return identity_error("INVALID_PASSWORD");
            }
            Json(json!({ "localId": "uid-ana", "email": "ana@example.com", "idToken": ANA_TOKEN }))
                .into_response()
        }
        "accounts:lookup" => match user_for_token(&field("idToken")) {
            Some((uid, email)) => {
                Json(json!({ "users": [{ "localId": uid, "email": email }] })).into_response()
            }
            None => identity_error("INVALID_ID_TOKEN"),
        },
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(user_for_token)
        .is_some()
}

fn document(uid: &str, id: &str, fields: &Map<String, Value>) -> Value {
    json!({
        "name": format!("projects/acurescan/databases/(default)/documents/users/{}/scans/{}", uid, id),
        "fields": fields,
    })
}

async fn list_documents(
    State(fake): State<FakeFirebase>,
    headers: HeaderMap,
    Path((_project, _db, uid)): Path<(String, String, String)>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let docs = fake.documents.lock().unwrap();
    let found: Vec<Value> = docs
        .iter()
        .filter(|((owner, _), _)| owner == &uid)
        .map(|((owner, id), fields)| document(owner, id, fields))
        .collect();
    if found.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": { "status": "NOT_FOUND" } })))
            .into_response();
    }
    Json(json!({ "documents": found })).into_response()
}

async fn create_document(
    State(fake): State<FakeFirebase>,
    headers: HeaderMap,
    Path((_project, _db, uid)): Path<(String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let id = query.get("documentId").cloned().unwrap_or_default();
    let fields = body.get("fields").and_then(Value::as_object).cloned().unwrap_or_default();
    let doc = document(&uid, &id, &fields);
    fake.documents.lock().unwrap().insert((uid, id), fields);
    Json(doc).into_response()
}

async fn get_document(
    State(fake): State<FakeFirebase>,
    headers: HeaderMap,
    Path((_project, _db, uid, id)): Path<(String, String, String, String)>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match fake.documents.lock().unwrap().get(&(uid.clone(), id.clone())) {
        Some(fields) => Json(document(&uid, &id, fields)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_document(
    State(fake): State<FakeFirebase>,
    headers: HeaderMap,
    Path((_project, _db, uid, id)): Path<(String, String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let removed = fake.documents.lock().unwrap().remove(&(uid, id));
    // Without the exists precondition Firestore deletes missing documents silently.
    if removed.is_none() && query.get("currentDocument.exists").map(String::as_str) == Some("true") {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": { "status": "NOT_FOUND" } })))
            .into_response();
    }
    Json(json!({})).into_response()
}

impl FakeFirebase {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/{method}", post(accounts))
            .route(
                "/v1/projects/{project}/databases/{db}/documents/users/{uid}/scans",
                get(list_documents).post(create_document),
            )
            .route(
                "/v1/projects/{project}/databases/{db}/documents/users/{uid}/scans/{id}",
                get(get_document).delete(delete_document),
            )
            .with_state(self.clone())
    }

    pub fn count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn config_for(upstream: &str) -> EdgeConfig {
    EdgeConfig {
        firebase_api_key: API_KEY.to_string(),
        identity_base_url: upstream.to_string(),
        firestore_base_url: upstream.to_string(),
        upstream_timeout_secs: 5,
        ..EdgeConfig::default()
    }
}

/// The edge app wired to a fresh fake Firebase.
pub async fn edge() -> (Router, FakeFirebase) {
    let fake = FakeFirebase::default();
    let upstream = spawn(fake.router()).await;
    let state = AppState::new(config_for(&upstream)).unwrap();
    (build_app(state), fake)
}

/// The edge app pointed at an address nothing listens on.
pub fn offline_edge(fallback: CorsFallback) -> Router {
    let config = EdgeConfig {
        cors_fallback: fallback,
        ..config_for("http://127.0.0.1:9")
    };
    build_app(AppState::new(config).unwrap())
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn call(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        headers,
        body,
    }
}

pub fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn json_req(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}
