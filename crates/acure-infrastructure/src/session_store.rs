//! Session persistence over the local key-value store.

use std::sync::Arc;

use acure_core::Result;
use acure_core::session::{Session, SessionStore, USER_DATA_KEY, USER_TOKEN_KEY};
use acure_core::storage::KeyValueStorage;

/// [`SessionStore`] keeping the token under `userToken` and the full
/// session as JSON under `userData`.
pub struct StorageSessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl StorageSessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

impl SessionStore for StorageSessionStore {
    fn get(&self) -> Option<Session> {
        let token = self.token()?;
        let raw = match self.storage.get_item(USER_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read user data: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            // The raw token key wins if the two ever disagree.
            Ok(session) => Some(Session { token, ..session }),
            Err(e) => {
                tracing::warn!("Discarding unreadable user data: {}", e);
                None
            }
        }
    }

    fn token(&self) -> Option<String> {
        match self.storage.get_item(USER_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read user token: {}", e);
                None
            }
        }
    }

    fn set(&self, session: &Session) -> Result<()> {
        let data = serde_json::to_string(session)?;
        // userData goes first so a token is never stored without it.
        self.storage.set_item(USER_DATA_KEY, &data)?;
        if let Err(e) = self.storage.set_item(USER_TOKEN_KEY, &session.token) {
            if let Err(rollback) = self.storage.remove_item(USER_DATA_KEY) {
                tracing::error!("Failed to roll back user data: {}", rollback);
            }
            return Err(e);
        }
        tracing::debug!("Stored session for token {}...", session.token_prefix());
        Ok(())
    }

    fn clear(&self) {
        for key in [USER_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::error!("Failed to remove '{}': {}", key, e);
            }
        }
        tracing::debug!("Session cleared");
    }
}
