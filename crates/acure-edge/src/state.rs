use std::sync::Arc;

use reqwest::Client;

use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::firestore::FirestoreClient;
use crate::identity::IdentityClient;

pub struct AppState {
    pub config: EdgeConfig,
    pub identity: IdentityClient,
    pub firestore: FirestoreClient,
}

impl AppState {
    pub fn new(config: EdgeConfig) -> Result<Arc<Self>, EdgeError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|e| EdgeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let identity = IdentityClient::new(
            http.clone(),
            config.identity_base_url.clone(),
            config.firebase_api_key.clone(),
        );
        let firestore = FirestoreClient::new(
            http,
            config.firestore_base_url.clone(),
            config.firebase_project_id.clone(),
        );

        Ok(Arc::new(Self {
            config,
            identity,
            firestore,
        }))
    }
}
