//! Platform paths for the Acure Scan client.
//!
//! ```text
//! ~/.config/acure/             # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/acure/        # Data directory
//! └── local_storage.json       # Session and cached scans
//! ```

use std::path::PathBuf;

use acure_core::{AcureError, Result};

const APP_DIR: &str = "acure";

pub struct AcurePaths;

impl AcurePaths {
    /// Platform config directory joined with `acure/`.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AcureError::config("Cannot find config directory"))
    }

    /// Platform data directory joined with `acure/`.
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| AcureError::config("Cannot find data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn local_storage_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("local_storage.json"))
    }
}
