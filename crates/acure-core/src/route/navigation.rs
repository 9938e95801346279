//! Navigation dispatcher.
//!
//! Writing the location does not notify listeners in the same document on
//! every host, so each navigation re-dispatches a change notification on the
//! next tick.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;

use super::location::{ParsedLocation, QueryMap, parse_location, to_hash};

/// Default delay between writing the location and notifying listeners.
pub const DEFAULT_NAVIGATION_TICK: Duration = Duration::from_millis(10);

/// The host that owns the current location (a browser window, a test double).
pub trait LocationHost: Send + Sync {
    /// Returns the current hash, including the leading `#` if any.
    fn hash(&self) -> String;

    /// Replaces the current hash.
    fn set_hash(&self, hash: &str);
}

/// In-process location, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    hash: RwLock<String>,
}

impl MemoryLocation {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            hash: RwLock::new(initial.into()),
        }
    }
}

impl LocationHost for MemoryLocation {
    fn hash(&self) -> String {
        self.hash
            .read()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    fn set_hash(&self, hash: &str) {
        if let Ok(mut current) = self.hash.write() {
            *current = hash.to_string();
        }
    }
}

/// Emitted after every navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChanged {
    /// The hash this navigation wrote.
    pub hash: String,
}

/// Assigns locations and re-dispatches change notifications.
#[derive(Clone)]
pub struct NavigationDispatcher {
    host: Arc<dyn LocationHost>,
    sender: broadcast::Sender<LocationChanged>,
    tick: Duration,
}

impl NavigationDispatcher {
    pub fn new(host: Arc<dyn LocationHost>) -> Self {
        Self::with_tick(host, DEFAULT_NAVIGATION_TICK)
    }

    pub fn with_tick(host: Arc<dyn LocationHost>, tick: Duration) -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { host, sender, tick }
    }

    /// Registers a listener for location changes.
    pub fn subscribe(&self) -> broadcast::Receiver<LocationChanged> {
        self.sender.subscribe()
    }

    /// Navigates to `target` (`/path?query` or `#/path?query`).
    ///
    /// Fire-and-forget: the location is written immediately and the
    /// notification follows after the tick. Calls are never coalesced.
    pub fn navigate(&self, target: &str) {
        let hash = to_hash(target);
        tracing::debug!("Navigating to: {}", hash);

        self.host.set_hash(&hash);

        let event = LocationChanged { hash };
        let sender = self.sender.clone();
        let tick = self.tick;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(tick).await;
                    // No listeners is fine
                    let _ = sender.send(event);
                });
            }
            Err(_) => {
                tracing::debug!("No async runtime, notifying location change synchronously");
                let _ = sender.send(event);
            }
        }
    }

    /// Emits a change notification for the current location without moving.
    pub fn notify_current(&self) {
        let _ = self.sender.send(LocationChanged {
            hash: self.host.hash(),
        });
    }

    pub fn current_location(&self) -> ParsedLocation {
        parse_location(&self.host.hash())
    }

    pub fn current_path(&self) -> String {
        self.current_location().path
    }

    pub fn query_params(&self) -> QueryMap {
        self.current_location().query
    }
}
