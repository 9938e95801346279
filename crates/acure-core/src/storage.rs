//! Client-local persistent key-value storage.
//!
//! Mirrors the shape of browser local storage: string keys, string values,
//! and a capacity ceiling that surfaces as [`AcureError::StorageQuotaExceeded`].

use crate::error::Result;

#[cfg(doc)]
use crate::error::AcureError;

/// Durable string key-value storage with a capacity ceiling.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`.
    ///
    /// Fails with `StorageQuotaExceeded` if the write would push the store
    /// past its capacity. A failed write leaves the previous value in place.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>>;

    fn clear(&self) -> Result<()>;
}
