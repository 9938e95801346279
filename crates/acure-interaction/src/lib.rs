//! reqwest clients for the Acure Scan REST API.

pub mod auth_api;
pub mod http;
pub mod scan_api;

pub use auth_api::AuthApiClient;
pub use http::{ApiClient, ApiResponse, Auth, Envelope};
pub use scan_api::ScanApiClient;
