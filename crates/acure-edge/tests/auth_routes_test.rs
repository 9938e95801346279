mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{ANA_TOKEN, call, edge, get_req, json_req};

#[tokio::test]
async fn register_returns_created_account() {
    let (app, _fake) = edge().await;
    let reply = call(
        &app,
        json_req(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "new@example.com", "password": "secret1", "name": "Nia" }),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(
        reply.body,
        json!({ "success": true, "data": {
            "uid": "uid-new", "email": "new@example.com", "name": "Nia", "token": "token-new"
        } })
    );
}

#[tokio::test]
async fn register_maps_identity_errors() {
    let (app, _fake) = edge().await;

    let taken = call(
        &app,
        json_req(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "taken@example.com", "password": "secret1", "name": "T" }),
        ),
    )
    .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.body["error"], "Email already registered");

    let weak = call(
        &app,
        json_req(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "new@example.com", "password": "123", "name": "T" }),
        ),
    )
    .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.body["error"], "Password should be at least 6 characters");
}

#[tokio::test]
async fn login_returns_token_or_mapped_error() {
    let (app, _fake) = edge().await;

    let ok = call(
        &app,
        json_req(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["uid"], "uid-ana");
    assert_eq!(ok.body["data"]["token"], ANA_TOKEN);

    let wrong = call(
        &app,
        json_req(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "nope!!" }),
        ),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, json!({ "success": false, "error": "Incorrect password" }));

    let unknown = call(
        &app,
        json_req(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": "secret1" }),
        ),
    )
    .await;
    assert_eq!(unknown.body["error"], "No account found with this email");
}

#[tokio::test]
async fn verify_resolves_token() {
    let (app, _fake) = edge().await;

    let ok = call(&app, get_req("/api/auth/verify", Some(ANA_TOKEN))).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(
        ok.body,
        json!({ "success": true, "data": { "uid": "uid-ana", "email": "ana@example.com" } })
    );

    let bad = call(&app, get_req("/api/auth/verify", Some("forged"))).await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["error"], "INVALID_ID_TOKEN");

    let missing = call(&app, get_req("/api/auth/verify", None)).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "No token provided");
}
