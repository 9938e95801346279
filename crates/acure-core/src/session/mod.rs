//! Session domain module.
//!
//! - `model`: the [`Session`] record
//! - `store`: the [`SessionStore`] trait

mod model;
mod store;

pub use model::{Session, token_prefix};
pub use store::SessionStore;

/// Storage key for the raw bearer token.
pub const USER_TOKEN_KEY: &str = "userToken";
/// Storage key for the JSON-encoded [`Session`].
pub const USER_DATA_KEY: &str = "userData";
