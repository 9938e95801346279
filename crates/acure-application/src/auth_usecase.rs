//! Auth use case: validate locally, call the backend, steer navigation.

use std::sync::Arc;

use acure_core::Result;
use acure_core::auth::{AuthService, LoginCredentials, Registration};
use acure_core::route::{DASHBOARD_PATH, LOGIN_PATH, NavigationDispatcher, ROOT_PATH};
use acure_core::session::{Session, SessionStore};

pub struct AuthUseCase {
    auth: Arc<dyn AuthService>,
    session: Arc<dyn SessionStore>,
    navigation: Arc<NavigationDispatcher>,
}

impl AuthUseCase {
    pub fn new(
        auth: Arc<dyn AuthService>,
        session: Arc<dyn SessionStore>,
        navigation: Arc<NavigationDispatcher>,
    ) -> Self {
        Self {
            auth,
            session,
            navigation,
        }
    }

    /// Signs in and moves to the dashboard.
    ///
    /// Invalid input fails with a validation error before any request.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session> {
        credentials.validate()?;
        let session = self.auth.login(credentials).await?;
        self.navigation.navigate(DASHBOARD_PATH);
        Ok(session)
    }

    /// Creates the account and sends the user to the login page.
    pub async fn register(&self, registration: &Registration) -> Result<Session> {
        let request = registration.validate()?;
        let created = self.auth.register(&request).await?;
        self.navigation.navigate(LOGIN_PATH);
        Ok(created)
    }

    /// Restores a stored session if the backend still accepts its token.
    ///
    /// Any verification failure destroys the stored session.
    pub async fn initialize(&self) -> Option<Session> {
        let session = self.session.get()?;
        tracing::debug!("Verifying stored token {}...", session.token_prefix());

        match self.auth.verify().await {
            Ok(user) => {
                tracing::info!("Session restored for {}", user.uid);
                Some(session)
            }
            Err(e) => {
                tracing::warn!("Stored session rejected: {}", e);
                self.session.clear();
                None
            }
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.get()
    }

    /// Signs out and returns the notification to show.
    ///
    /// The local session is gone either way; a failed remote call lands on
    /// the login page instead of the landing page.
    pub async fn logout(&self) -> &'static str {
        match self.auth.logout().await {
            Ok(()) => {
                self.navigation.navigate(ROOT_PATH);
                "Logout successful"
            }
            Err(e) => {
                tracing::warn!("Logout call failed: {}", e);
                self.session.clear();
                self.navigation.navigate(LOGIN_PATH);
                "Logged out (with possible issues)"
            }
        }
    }
}
