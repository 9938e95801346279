//! Auth service trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::Session;

use super::credentials::{LoginCredentials, RegisterRequest};

/// Identity confirmed by the verify endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub uid: String,
    #[serde(default)]
    pub email: String,
}

/// Client side of the auth REST API.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account. Does not sign in.
    async fn register(&self, request: &RegisterRequest) -> Result<Session>;

    /// Signs in and persists the resulting session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session>;

    /// Confirms the stored token is still accepted.
    async fn verify(&self) -> Result<VerifiedUser>;

    /// Signs out. The local session is cleared even when the call fails.
    async fn logout(&self) -> Result<()>;
}
