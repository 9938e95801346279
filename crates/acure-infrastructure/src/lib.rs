pub mod config_service;
pub mod image_compression;
pub mod paths;
pub mod scan_cache;
pub mod session_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::image_compression::compress_for_upload;
pub use crate::paths::AcurePaths;
pub use crate::scan_cache::{ScanCache, generate_scan_id};
pub use crate::session_store::StorageSessionStore;
pub use crate::storage::{FileStorage, MemoryStorage};
