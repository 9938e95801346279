//! Application shell: resolve the current location, gate it, render it.

use std::sync::Arc;

use acure_core::config::ClientConfig;
use acure_core::route::{AuthGate, LocationHost, NavigationDispatcher, Route, RouteTable};
use acure_core::scan::{RemoteScanService, ScanCacheRepository};
use acure_core::session::SessionStore;
use acure_core::storage::KeyValueStorage;
use acure_infrastructure::{AcurePaths, ConfigService, FileStorage, ScanCache, StorageSessionStore};
use acure_interaction::{ApiClient, AuthApiClient, ScanApiClient};
use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;

use crate::auth_usecase::AuthUseCase;
use crate::pages::{PageContext, PageController, PageView};
use crate::scan_usecase::ScanUseCase;

/// A page that passed the auth gate.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub route: &'static Route,
    pub view: PageView,
}

pub struct App {
    routes: RouteTable,
    navigation: Arc<NavigationDispatcher>,
    session: Arc<dyn SessionStore>,
    context: PageContext,
}

impl App {
    pub fn new(
        navigation: Arc<NavigationDispatcher>,
        session: Arc<dyn SessionStore>,
        context: PageContext,
    ) -> Self {
        Self {
            routes: RouteTable::new(),
            navigation,
            session,
            context,
        }
    }

    /// Wires the production collaborators over `storage`.
    pub fn with_storage(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
        host: Arc<dyn LocationHost>,
    ) -> Self {
        let navigation = Arc::new(NavigationDispatcher::with_tick(host, config.navigation_tick()));
        let session: Arc<dyn SessionStore> = Arc::new(StorageSessionStore::new(storage.clone()));
        let cache: Arc<dyn ScanCacheRepository> =
            Arc::new(ScanCache::new(storage, config.cache.clone()));

        let api = ApiClient::new(config, session.clone());
        let auth = Arc::new(AuthApiClient::new(api.clone()));
        let remote: Arc<dyn RemoteScanService> = Arc::new(ScanApiClient::new(api));

        let context = PageContext {
            auth: AuthUseCase::new(auth, session.clone(), navigation.clone()),
            scans: ScanUseCase::new(cache, remote, session.clone(), navigation.clone()),
        };
        Self::new(navigation, session, context)
    }

    /// Loads the config and opens the on-disk store under the platform data dir.
    pub fn bootstrap(host: Arc<dyn LocationHost>) -> anyhow::Result<Self> {
        let config = ConfigService::new()?.load()?;
        acure_infrastructure::config_service::validate(&config)?;

        let path = AcurePaths::local_storage_file()?;
        let storage = FileStorage::open(path.clone(), config.cache.capacity_chars)
            .with_context(|| format!("Failed to open local storage at {}", path.display()))?;

        tracing::info!("Acure client ready against {}", config.api_base_url);
        Ok(Self::with_storage(&config, Arc::new(storage), host))
    }

    pub fn navigation(&self) -> &Arc<NavigationDispatcher> {
        &self.navigation
    }

    pub fn auth(&self) -> &AuthUseCase {
        &self.context.auth
    }

    pub fn scans(&self) -> &ScanUseCase {
        &self.context.scans
    }

    /// Renders the page for the current location.
    ///
    /// Returns `None` when the auth gate redirected instead.
    pub async fn render_page(&self) -> Option<RenderedPage> {
        let location = self.navigation.current_location();
        let route = self.routes.resolve(&location.path);
        tracing::debug!("Rendering {} with {} params", location.path, location.query.len());

        if !AuthGate::enforce(&self.navigation, route, &location.path, self.session.has_token()) {
            return None;
        }

        let view = PageController::from(route.page)
            .render(&self.context, &location.query)
            .await;
        Some(RenderedPage { route, view })
    }

    /// Renders the current page, then re-renders after every location change.
    ///
    /// Loops for as long as the app is alive; callers run it as a task.
    pub async fn run<F>(&self, mut on_render: F)
    where
        F: FnMut(RenderedPage),
    {
        let mut changes = self.navigation.subscribe();

        if let Some(page) = self.render_page().await {
            on_render(page);
        }

        loop {
            match changes.recv().await {
                Ok(_) => {
                    if let Some(page) = self.render_page().await {
                        on_render(page);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} stale location changes", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
