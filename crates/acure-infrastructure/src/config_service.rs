//! Client configuration loading.
//!
//! Reads `config.toml` from the platform config directory, falling back to
//! defaults when the file is missing, then applies environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use acure_core::config::ClientConfig;
use acure_core::{AcureError, Result};

use crate::paths::AcurePaths;

pub const ENV_API_BASE_URL: &str = "ACURE_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ACURE_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Service reading the default platform config file.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: AcurePaths::config_file()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file (or defaults) and applies process env overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }
}

/// Applies overrides from `lookup`. Unparseable values are ignored with a warning.
pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.request_timeout_secs = secs,
            _ => tracing::warn!(
                "Ignoring invalid {}='{}', keeping {}s",
                ENV_REQUEST_TIMEOUT_SECS,
                raw,
                config.request_timeout_secs
            ),
        }
    }
}

/// Validates values that would make the client unusable.
pub fn validate(config: &ClientConfig) -> Result<()> {
    if !(config.api_base_url.starts_with("http://") || config.api_base_url.starts_with("https://")) {
        return Err(AcureError::config(format!(
            "api_base_url must be an http(s) URL, got '{}'",
            config.api_base_url
        )));
    }
    if config.request_timeout_secs == 0 {
        return Err(AcureError::config("request_timeout_secs must be positive"));
    }
    Ok(())
}
