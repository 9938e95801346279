//! Origin-echoing CORS policy.
//!
//! An origin is allowed when it is on the allow-list or ends in one of the
//! hosting suffixes. Allowed origins are echoed back. Anything else either
//! gets the default origin (the first allow-list entry) or no
//! `Access-Control-Allow-Origin` at all, depending on [`CorsFallback`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::EdgeConfig;

pub const ALLOWED_SUFFIXES: [&str; 2] = [".netlify.app", ".github.io"];
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, Accept, Origin, X-Requested-With";

/// What to do with an origin that is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorsFallback {
    /// Answer with the default origin.
    #[default]
    Fallback,
    /// Omit the allow-origin header and refuse preflights.
    Reject,
}

impl FromStr for CorsFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fallback" => Ok(CorsFallback::Fallback),
            "reject" => Ok(CorsFallback::Reject),
            other => Err(format!("expected 'fallback' or 'reject', got '{}'", other)),
        }
    }
}

impl fmt::Display for CorsFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsFallback::Fallback => write!(f, "fallback"),
            CorsFallback::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<String>,
    fallback: CorsFallback,
}

impl CorsPolicy {
    pub fn new(allowed: Vec<String>, fallback: CorsFallback) -> Self {
        Self { allowed, fallback }
    }

    pub fn from_config(config: &EdgeConfig) -> Self {
        Self::new(config.allowed_origins.clone(), config.cors_fallback)
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.iter().any(|a| a == origin)
            || ALLOWED_SUFFIXES.iter().any(|suffix| origin.ends_with(suffix))
    }

    /// The `Access-Control-Allow-Origin` value for a request origin.
    pub fn allow_origin(&self, origin: &str) -> Option<String> {
        if self.is_allowed(origin) {
            return Some(origin.to_string());
        }

        match self.fallback {
            CorsFallback::Fallback => {
                let default = self.allowed.first()?;
                if origin.is_empty() {
                    tracing::debug!("No Origin header, answering with {}", default);
                } else {
                    tracing::warn!("Origin {} not allowed, answering with {}", origin, default);
                }
                Some(default.clone())
            }
            CorsFallback::Reject => {
                if !origin.is_empty() {
                    tracing::warn!("Origin {} not allowed, rejecting", origin);
                }
                None
            }
        }
    }

    /// Writes the CORS headers for `origin` into `headers`.
    pub fn apply(&self, origin: &str, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("Authorization"),
        );

        let allowed = self
            .allow_origin(origin)
            .and_then(|o| HeaderValue::from_str(&o).ok());
        match allowed {
            Some(value) => {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                headers.insert(header::VARY, HeaderValue::from_static("Origin"));
            }
            None => {
                headers.remove(header::ACCESS_CONTROL_ALLOW_ORIGIN);
            }
        }
    }
}

/// Answers preflights directly and stamps CORS headers on every other response.
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if request.method() == Method::OPTIONS {
        let status = if policy.fallback == CorsFallback::Reject && !policy.is_allowed(&origin) {
            StatusCode::FORBIDDEN
        } else {
            StatusCode::OK
        };
        let mut response = status.into_response();
        policy.apply(&origin, response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(&origin, response.headers_mut());
    response
}
