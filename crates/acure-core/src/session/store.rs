//! Session store trait.

use crate::error::Result;

use super::model::Session;

/// Client-side holder of the single active session.
///
/// Injected into every component that needs the bearer token instead of
/// reading ambient global storage.
pub trait SessionStore: Send + Sync {
    /// The persisted session, if both token and user data are present and readable.
    fn get(&self) -> Option<Session>;

    /// The bearer token alone. May exist without readable user data.
    fn token(&self) -> Option<String>;

    /// Persists `session`, replacing any previous one.
    fn set(&self, session: &Session) -> Result<()>;

    /// Destroys the session. Never fails; storage errors are logged.
    fn clear(&self);

    /// Whether a non-empty token is present.
    fn has_token(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}
