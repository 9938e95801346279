//! Session domain model.

use serde::{Deserialize, Serialize};

/// The signed-in user and their bearer token.
///
/// Serialized in the `userData` shape the auth backend returns:
/// `{uid, email, name, token}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(rename = "uid")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// First characters of the token, safe for logs.
    pub fn token_prefix(&self) -> &str {
        token_prefix(&self.token)
    }
}

/// Returns at most the first 10 characters of a token.
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(10) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}
