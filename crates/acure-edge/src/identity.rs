//! Identity Toolkit REST client.
//!
//! Wraps `accounts:signUp`, `accounts:signInWithPassword` and
//! `accounts:lookup`, and maps the upstream error codes to the messages the
//! client shows to users.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UpstreamError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAccount {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id_token: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<IdentityUser>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_code(&text).unwrap_or(text);
            tracing::debug!("accounts:{} rejected ({}): {}", method, status, message);
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityAccount, UpstreamError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.call("signUp", &body).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, UpstreamError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.call("signInWithPassword", &body).await
    }

    /// Resolves an ID token to its user.
    pub async fn lookup(&self, id_token: &str) -> Result<IdentityUser, UpstreamError> {
        let response: LookupResponse = self.call("lookup", &LookupRequest { id_token }).await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Rejected {
                status: 400,
                message: "USER_NOT_FOUND".to_string(),
            })
    }
}

/// `error.message` of an Identity Toolkit error body.
fn error_code(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// User-facing message for a failed sign-up.
pub fn register_message(code: &str) -> &'static str {
    let code = code.to_ascii_lowercase();
    if code.contains("email_exists") {
        "Email already registered"
    } else if code.contains("invalid_email") {
        "Invalid email address"
    } else if code.contains("weak_password") {
        "Password should be at least 6 characters"
    } else {
        "Registration failed"
    }
}

/// User-facing message for a failed sign-in.
pub fn login_message(code: &str) -> &'static str {
    let code = code.to_ascii_lowercase();
    if code.contains("invalid_email") {
        "Invalid email address"
    } else if code.contains("user_disabled") {
        "This account has been disabled"
    } else if code.contains("email_not_found") {
        "No account found with this email"
    } else if code.contains("invalid_password") {
        "Incorrect password"
    } else if code.contains("invalid_credential") {
        "Invalid email or password"
    } else {
        "Login failed"
    }
}
