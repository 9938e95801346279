//! Scan persistence traits: the local cache and the remote history.

use async_trait::async_trait;

use crate::error::Result;

use super::model::ScanRecord;

/// Durable local cache of scan records, keyed by scan id.
pub trait ScanCacheRepository: Send + Sync {
    /// Stores `record`, assigning an id if it has none. Returns the stored copy.
    fn put(&self, record: ScanRecord) -> Result<ScanRecord>;

    /// Returns the cached record, or `None` if the id is unknown.
    fn get(&self, id: &str) -> Result<Option<ScanRecord>>;

    /// All cached records, newest id first.
    fn list(&self) -> Result<Vec<ScanRecord>>;

    fn remove(&self, id: &str) -> Result<()>;
}

/// Remote scan history behind the scan API.
///
/// Every call is bearer-authenticated and bounded by a client-side timeout.
/// Implementations perform no retries.
#[async_trait]
pub trait RemoteScanService: Send + Sync {
    /// Persists `record` for `user_id` and returns the server-assigned id.
    async fn save(&self, user_id: &str, record: &ScanRecord) -> Result<String>;

    /// All scans of `user_id`. A missing history is an empty list.
    async fn list(&self, user_id: &str) -> Result<Vec<ScanRecord>>;

    async fn get_by_id(&self, user_id: &str, id: &str) -> Result<ScanRecord>;

    /// Returns whether the backend reported success.
    async fn delete(&self, user_id: &str, id: &str) -> Result<bool>;
}
