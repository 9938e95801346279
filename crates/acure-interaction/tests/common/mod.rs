#![allow(dead_code)]

use std::sync::Arc;

use acure_core::config::ClientConfig;
use acure_core::session::{Session, SessionStore};
use acure_infrastructure::{MemoryStorage, StorageSessionStore};
use acure_interaction::ApiClient;
use axum::Router;
use axum::http::HeaderMap;
use tokio::net::TcpListener;

pub const GOOD_TOKEN: &str = "good-token-0123456789";

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn client(base_url: &str, timeout_secs: u64) -> (ApiClient, Arc<dyn SessionStore>) {
    let storage = Arc::new(MemoryStorage::default());
    let session: Arc<dyn SessionStore> = Arc::new(StorageSessionStore::new(storage));
    let config = ClientConfig {
        api_base_url: base_url.to_string(),
        request_timeout_secs: timeout_secs,
        ..ClientConfig::default()
    };
    (ApiClient::new(&config, session.clone()), session)
}

pub fn signed_in(session: &Arc<dyn SessionStore>, token: &str) {
    session
        .set(&Session::new(token, "uid-1", "ana@example.com", "Ana"))
        .unwrap();
}
