//! Edge configuration, read from the process environment.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::cors::CorsFallback;
use crate::error::EdgeError;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_PROJECT_ID: &str = "acurescan";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 5] = [
    "http://localhost:9000",
    "https://elaborate-duckanoo-4121a7.netlify.app",
    "https://mabduls.github.io/acure-scan",
    "https://mabduls.github.io",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeConfig {
    pub port: u16,
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    /// Exact origins echoed back by the CORS policy. The first entry is the
    /// default origin handed to unlisted callers.
    pub allowed_origins: Vec<String>,
    pub cors_fallback: CorsFallback,
    pub identity_base_url: String,
    pub firestore_base_url: String,
    pub upstream_timeout_secs: u64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            firebase_api_key: String::new(),
            firebase_project_id: DEFAULT_PROJECT_ID.to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
            cors_fallback: CorsFallback::default(),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl EdgeConfig {
    pub fn load() -> Result<Self, EdgeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EdgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let firebase_api_key = lookup("FIREBASE_API_KEY").unwrap_or_else(|| {
            warn!("FIREBASE_API_KEY not set, upstream calls will be rejected");
            String::new()
        });

        let allowed_origins = match lookup("ACURE_ALLOWED_ORIGINS") {
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if origins.is_empty() {
                    return Err(EdgeError::Config(
                        "ACURE_ALLOWED_ORIGINS must name at least one origin".to_string(),
                    ));
                }
                origins
            }
            None => defaults.allowed_origins,
        };

        Ok(Self {
            port: try_load(&lookup, "ACURE_EDGE_PORT", defaults.port)?,
            firebase_api_key,
            firebase_project_id: lookup("FIREBASE_PROJECT_ID")
                .unwrap_or(defaults.firebase_project_id),
            allowed_origins,
            cors_fallback: try_load(&lookup, "ACURE_CORS_FALLBACK", defaults.cors_fallback)?,
            identity_base_url: lookup("ACURE_IDENTITY_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.identity_base_url),
            firestore_base_url: lookup("ACURE_FIRESTORE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.firestore_base_url),
            upstream_timeout_secs: try_load(
                &lookup,
                "ACURE_UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn default_origin(&self) -> &str {
        self.allowed_origins.first().map(String::as_str).unwrap_or_default()
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, EdgeError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            EdgeError::Config(format!("Invalid {key} value '{raw}': {e}"))
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
