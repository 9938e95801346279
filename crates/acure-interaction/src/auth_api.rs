//! Auth REST client.

use acure_core::auth::{AuthService, LoginCredentials, RegisterRequest, VerifiedUser};
use acure_core::session::Session;
use acure_core::{AcureError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::http::{ApiClient, Auth};

/// `data` of a register or login response.
#[derive(Debug, Deserialize)]
struct AuthData {
    uid: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    token: String,
}

impl AuthData {
    fn into_session(self) -> Session {
        Session::new(self.token, self.uid, self.email, self.name.unwrap_or_default())
    }
}

pub struct AuthApiClient {
    api: ApiClient,
}

impl AuthApiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn decode(data: serde_json::Value) -> Result<AuthData> {
        serde_json::from_value(data).map_err(AcureError::from)
    }
}

#[async_trait]
impl AuthService for AuthApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<Session> {
        let response = self
            .api
            .send(self.api.post("/api/auth/register").json(&json!({
                "name": request.name,
                "email": request.email,
                "password": request.password,
            })))
            .await?;
        let envelope = self.api.check(response, Auth::Public, "Registration failed")?;

        let session = Self::decode(envelope.data)?.into_session();
        tracing::info!("Registered account for {}", session.email);
        Ok(session)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<Session> {
        let response = self
            .api
            .send(self.api.post("/api/auth/login").json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            })))
            .await?;
        let envelope = self.api.check(response, Auth::Public, "Login failed")?;

        let session = Self::decode(envelope.data)?.into_session();
        if session.token.is_empty() {
            return Err(AcureError::remote(200, "Login response carried no token"));
        }
        self.api.session().set(&session)?;

        tracing::info!("Logged in as {}", session.user_id);
        Ok(session)
    }

    async fn verify(&self) -> Result<VerifiedUser> {
        let request = self.api.authorize(self.api.get("/api/auth/verify"))?;
        let response = self.api.send(request).await?;
        let envelope = self.api.check(response, Auth::Bearer, "Verification failed")?;

        Ok(serde_json::from_value(envelope.data)?)
    }

    async fn logout(&self) -> Result<()> {
        let session = self.api.session().clone();

        let result = match self.api.authorize(self.api.post("/api/auth/logout")) {
            Ok(request) => match self.api.send(request).await {
                Ok(response) => self
                    .api
                    .check(response, Auth::Public, "Logout failed")
                    .map(|_| ()),
                Err(e) => Err(e),
            },
            // Nothing to revoke remotely
            Err(_) => Ok(()),
        };

        session.clear();
        tracing::info!("Logged out");
        result
    }
}
