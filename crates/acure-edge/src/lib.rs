//! Acure Scan edge API.
//!
//! A small HTTP service sitting between the browser client and Firebase:
//!
//! - `POST /api/auth/register|login|logout`, `GET /api/auth/verify` proxy
//!   Identity Toolkit and translate its error codes into user-facing text.
//! - `/api/scans` stores scan history in Firestore under `users/{uid}/scans`,
//!   after checking the bearer token belongs to the `userId` in the request.
//! - Every response carries CORS headers from [`cors::CorsPolicy`];
//!   preflights are answered without reaching a handler.
//!
//! # Configuration
//!
//! Read from the environment by [`EdgeConfig::load`]:
//!
//! | Variable | Default |
//! |---|---|
//! | `ACURE_EDGE_PORT` | `8787` |
//! | `FIREBASE_API_KEY` | empty (warns) |
//! | `FIREBASE_PROJECT_ID` | `acurescan` |
//! | `ACURE_ALLOWED_ORIGINS` | built-in allow-list, comma separated |
//! | `ACURE_CORS_FALLBACK` | `fallback` (or `reject`) |
//! | `ACURE_IDENTITY_BASE_URL` | `https://identitytoolkit.googleapis.com` |
//! | `ACURE_FIRESTORE_BASE_URL` | `https://firestore.googleapis.com` |
//! | `ACURE_UPSTREAM_TIMEOUT_SECS` | `15` |
//!
//! Log output is controlled with `RUST_LOG`.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod cors;
pub mod error;
pub mod firestore;
pub mod handlers;
pub mod identity;
pub mod state;

pub use config::EdgeConfig;
pub use cors::{CorsFallback, CorsPolicy};
pub use error::{EdgeError, UpstreamError};
pub use state::AppState;

use handlers::{auth, scans};

pub fn build_app(state: Arc<AppState>) -> Router {
    let policy = Arc::new(CorsPolicy::from_config(&state.config));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/test", get(handlers::smoke_test))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/scans", get(scans::list_scans).post(scans::save_scan))
        .route(
            "/api/scans/{id}",
            get(scans::get_scan).delete(scans::delete_scan),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(policy, cors::cors_middleware))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(config: EdgeConfig) -> anyhow::Result<()> {
    info!("Initializing state...");
    let port = config.port;
    let state = AppState::new(config)?;
    let app = build_app(state);

    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
