//! Scan use case.
//!
//! Ties the classifier output to the local cache and the remote history.
//! Every path that ends in `AuthExpired` clears the session and sends the
//! user to the login page.

use std::sync::Arc;

use acure_core::route::{LOGIN_PATH, NavigationDispatcher};
use acure_core::scan::{RemoteScanService, ScanCacheRepository, ScanRecord};
use acure_core::session::{Session, SessionStore};
use acure_core::{AcureError, Result};
use acure_infrastructure::compress_for_upload;

pub struct ScanUseCase {
    cache: Arc<dyn ScanCacheRepository>,
    remote: Arc<dyn RemoteScanService>,
    session: Arc<dyn SessionStore>,
    navigation: Arc<NavigationDispatcher>,
}

impl ScanUseCase {
    pub fn new(
        cache: Arc<dyn ScanCacheRepository>,
        remote: Arc<dyn RemoteScanService>,
        session: Arc<dyn SessionStore>,
        navigation: Arc<NavigationDispatcher>,
    ) -> Self {
        Self {
            cache,
            remote,
            session,
            navigation,
        }
    }

    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(AcureError::AuthExpired) = &result {
            tracing::info!("Session expired, redirecting to login");
            self.session.clear();
            self.navigation.navigate(LOGIN_PATH);
        }
        result
    }

    fn current_user(&self) -> Result<Session> {
        self.session.get().ok_or(AcureError::AuthExpired)
    }

    /// Builds a record from classifier scores, caches it and opens the result page.
    pub fn record_scan(&self, scores: &[f32], image_ref: impl Into<String>) -> Result<ScanRecord> {
        let record = ScanRecord::from_scores(scores, image_ref);
        let stored = self.cache.put(record)?;

        if let Some(id) = stored.id() {
            tracing::info!("Scan {} recorded: {} ({})", id, stored.dominant_label, stored.confidence);
            self.navigation.navigate(&format!("/result?scanId={}", id));
        }
        Ok(stored)
    }

    /// Uploads a cached scan and re-caches it under the server id.
    ///
    /// Large images are compressed first and the compressed copy is what
    /// gets re-cached.
    pub async fn save_remote(&self, local_id: &str) -> Result<String> {
        let result = async {
            let user = self.current_user()?;
            let record = self
                .cache
                .get(local_id)?
                .ok_or_else(|| AcureError::not_found("scan", local_id))?;

            let mut record = record;
            if let Some(compressed) = compress_for_upload(&record.image_ref) {
                record.image_ref = compressed;
            }

            let server_id = self.remote.save(&user.user_id, &record).await?;
            self.cache.put(record.with_id(server_id.clone()))?;
            Ok(server_id)
        }
        .await;
        self.guard(result)
    }

    /// The cached result shown right after a scan.
    pub fn load_result(&self, id: &str) -> Result<ScanRecord> {
        self.cache
            .get(id)?
            .ok_or_else(|| AcureError::not_found("scan", id))
    }

    /// Locally cached scans, newest first.
    pub fn cached(&self) -> Result<Vec<ScanRecord>> {
        self.cache.list()
    }

    /// A saved scan fetched from the remote history.
    pub async fn load_detail(&self, id: &str) -> Result<ScanRecord> {
        let result = async {
            let user = self.current_user()?;
            self.remote.get_by_id(&user.user_id, id).await
        }
        .await;
        self.guard(result)
    }

    /// The signed-in user's remote history.
    pub async fn history(&self) -> Result<Vec<ScanRecord>> {
        let result = async {
            let user = self.current_user()?;
            self.remote.list(&user.user_id).await
        }
        .await;
        self.guard(result)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = async {
            let user = self.current_user()?;
            let deleted = self.remote.delete(&user.user_id, id).await?;
            if deleted {
                self.cache.remove(id)?;
            }
            Ok(deleted)
        }
        .await;
        self.guard(result)
    }
}
