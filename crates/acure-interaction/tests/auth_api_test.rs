mod common;

use acure_core::AcureError;
use acure_core::auth::{AuthService, LoginCredentials, Registration};
use acure_interaction::AuthApiClient;
use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

use common::{GOOD_TOKEN, bearer, client, signed_in, spawn};

fn auth_backend() -> Router {
    Router::new()
        .route(
            "/api/auth/register",
            post(|Json(body): Json<Value>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "success": true,
                        "data": {"uid": "uid-new", "email": body["email"], "name": body["name"], "token": "fresh"}
                    })),
                )
            }),
        )
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "secret1" {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "success": true,
                            "data": {"uid": "uid-1", "email": body["email"], "token": GOOD_TOKEN}
                        })),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"success": false, "error": "Incorrect password"})),
                    )
                }
            }),
        )
        .route(
            "/api/auth/verify",
            get(|headers: HeaderMap| async move {
                if bearer(&headers).as_deref() == Some(GOOD_TOKEN) {
                    (
                        StatusCode::OK,
                        Json(json!({"success": true, "data": {"uid": "uid-1", "email": "ana@example.com"}})),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"success": false, "error": "INVALID_ID_TOKEN"})),
                    )
                }
            }),
        )
        .route(
            "/api/auth/logout",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "error": "boom"})),
                )
            }),
        )
}

#[tokio::test]
async fn login_persists_session_and_verify_accepts_it() {
    let base = spawn(auth_backend()).await;
    let (api, session) = client(&base, 15);
    let auth = AuthApiClient::new(api);

    let logged_in = auth
        .login(&LoginCredentials::new("ana@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(logged_in.user_id, "uid-1");
    assert_eq!(session.token().as_deref(), Some(GOOD_TOKEN));
    assert_eq!(session.get().unwrap().email, "ana@example.com");

    let verified = auth.verify().await.unwrap();
    assert_eq!(verified.uid, "uid-1");
}

#[tokio::test]
async fn bad_credentials_are_a_remote_error_not_expiry() {
    let base = spawn(auth_backend()).await;
    let (api, session) = client(&base, 15);
    let auth = AuthApiClient::new(api);

    let err = auth
        .login(&LoginCredentials::new("ana@example.com", "wrong1"))
        .await
        .unwrap_err();

    assert_eq!(err, AcureError::remote(401, "Incorrect password"));
    assert_eq!(err.user_message(), "Incorrect password");
    assert!(session.get().is_none());
}

#[tokio::test]
async fn register_does_not_sign_in() {
    let base = spawn(auth_backend()).await;
    let (api, session) = client(&base, 15);
    let auth = AuthApiClient::new(api);

    let request = Registration::new("Ana", "ana@example.com", "secret1", "secret1")
        .validate()
        .unwrap();
    let created = auth.register(&request).await.unwrap();

    assert_eq!(created.user_id, "uid-new");
    assert_eq!(created.name, "Ana");
    assert!(!session.has_token());
}

#[tokio::test]
async fn rejected_token_clears_session() {
    let base = spawn(auth_backend()).await;
    let (api, session) = client(&base, 15);
    signed_in(&session, "stale-token");
    let auth = AuthApiClient::new(api);

    let err = auth.verify().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(!session.has_token());
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
    let base = spawn(auth_backend()).await;
    let (api, session) = client(&base, 15);
    signed_in(&session, GOOD_TOKEN);
    let auth = AuthApiClient::new(api);

    let result = auth.logout().await;
    assert!(matches!(result, Err(AcureError::Remote { status: 500, .. })));
    assert!(session.get().is_none());
}

#[tokio::test]
async fn verify_without_token_makes_no_request() {
    // Nothing listens here; a request would fail with a network error
    let (api, _session) = client("http://127.0.0.1:9", 15);
    let auth = AuthApiClient::new(api);

    assert_eq!(auth.verify().await.unwrap_err(), AcureError::AuthExpired);
}
