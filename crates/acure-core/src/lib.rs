//! Domain core of the Acure Scan client.
//!
//! Holds the models, the error taxonomy and the traits the other crates
//! implement, plus the pure pieces of client logic: hash-route parsing, the
//! route table, the auth gate, navigation dispatch, label ranking and
//! payload normalization.

pub mod auth;
pub mod config;
pub mod error;
pub mod route;
pub mod scan;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{AcureError, Result};
