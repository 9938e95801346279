//! Shared HTTP plumbing for the Acure Scan REST API.
//!
//! Every response uses the envelope `{success, data, error?, message?}`.
//! Bearer-authenticated calls that come back 401 destroy the local session
//! and surface as [`AcureError::AuthExpired`].

use std::sync::Arc;
use std::time::Duration;

use acure_core::config::ClientConfig;
use acure_core::session::{SessionStore, token_prefix};
use acure_core::{AcureError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// `error`, then `message`.
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub envelope: Envelope,
}

/// Whether a request carried the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Public,
    Bearer,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Attaches the session's bearer token.
    ///
    /// Fails with `AuthExpired` before any network traffic when no token is stored.
    pub fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.token().ok_or(AcureError::AuthExpired)?;
        tracing::debug!("Authorizing request with token {}...", token_prefix(&token));
        Ok(request.bearer_auth(token))
    }

    /// Sends `request` under the client deadline and decodes the envelope.
    ///
    /// Only transport failures are errors here; status handling is left to
    /// [`ApiClient::check`] so callers can special-case codes like 404.
    pub async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let envelope = if body.trim().is_empty() {
            Envelope::default()
        } else {
            serde_json::from_str(&body).unwrap_or_else(|_| Envelope {
                error: Some(body.clone()),
                ..Envelope::default()
            })
        };

        tracing::debug!("API response status: {}", status);
        Ok(ApiResponse { status, envelope })
    }

    /// Maps a response to its envelope or the matching error.
    pub fn check(&self, response: ApiResponse, auth: Auth, fallback: &str) -> Result<Envelope> {
        let ApiResponse { status, envelope } = response;

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            tracing::warn!("Bearer token rejected, clearing session");
            self.session.clear();
            return Err(AcureError::AuthExpired);
        }

        if !status.is_success() || !envelope.success {
            let message = envelope.error_message().unwrap_or(fallback).to_string();
            return Err(AcureError::remote(status.as_u16(), message));
        }

        Ok(envelope)
    }
}
