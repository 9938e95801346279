//! Error types for the Acure Scan client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the client crates.
///
/// Variants follow the failure modes a presenter has to tell apart: local
/// validation, an expired session, a missing resource, a failed remote call,
/// a client-side deadline, and local storage running out of room.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AcureError {
    /// User input rejected before any network call. The message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// The backend answered 401 (or no token was available).
    #[error("Authentication expired. Please login again.")]
    AuthExpired,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Non-2xx answer from the backend other than 401/404
    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// The backend did not answer within the client deadline
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// Local cache write failed after one eviction-retry
    #[error("Local storage quota exceeded")]
    StorageQuotaExceeded,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure (connection refused, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AcureError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Remote error
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::StorageQuotaExceeded)
    }

    /// Message suitable for a user-visible notification.
    ///
    /// Presenters convert every error into a notification rather than a crash;
    /// infrastructure details are collapsed into a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::AuthExpired | Self::Timeout | Self::StorageQuotaExceeded => self.to_string(),
            Self::NotFound { entity_type, .. } => format!("{} not found", capitalize(entity_type)),
            Self::Remote { body, .. } if !body.is_empty() => body.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AcureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AcureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AcureError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AcureError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// A type alias for `Result<T, AcureError>`.
pub type Result<T> = std::result::Result<T, AcureError>;
