//! Versioned current-route store.
//!
//! Holds the one "current route" value. A navigation resolves the new path
//! completely, then replaces the value in a single step, bumping the version
//! and cancelling the token of the route it replaced. Observers either
//! subscribe for change notifications or compare versions.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::controller::{self, Resolution};

/// The current route at one point in time
#[derive(Debug, Clone)]
pub struct VersionedRoute {
    pub version: u64,
    pub resolution: Arc<Resolution>,
    token: CancellationToken,
}

impl VersionedRoute {
    fn first(resolution: Resolution) -> Self {
        Self {
            version: 0,
            resolution: Arc::new(resolution),
            token: CancellationToken::new(),
        }
    }

    fn successor(&self, resolution: Resolution) -> Self {
        Self {
            version: self.version + 1,
            resolution: Arc::new(resolution),
            token: CancellationToken::new(),
        }
    }

    /// Completes once this route has been navigated away from
    pub async fn superseded(&self) {
        self.token.cancelled().await
    }

    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Single source of truth for the current route
#[derive(Debug)]
pub struct RouteStore {
    tx: watch::Sender<VersionedRoute>,
}

impl RouteStore {
    /// Start a store already resolved to `path`
    pub fn new(path: &str) -> Self {
        let (tx, _) = watch::channel(VersionedRoute::first(controller::resolve(path)));
        Self { tx }
    }

    pub fn current(&self) -> VersionedRoute {
        self.tx.borrow().clone()
    }

    pub fn is_current(&self, version: u64) -> bool {
        self.tx.borrow().version == version
    }

    pub fn subscribe(&self) -> watch::Receiver<VersionedRoute> {
        self.tx.subscribe()
    }

    /// Navigate to `path` and return the route that became current
    pub fn navigate(&self, path: &str) -> VersionedRoute {
        // Resolve before touching the shared value so no observer can see a
        // half-applied navigation
        let resolution = controller::resolve(path);

        let mut published = None;
        self.tx.send_modify(|current| {
            current.token.cancel();
            let next = current.successor(resolution);
            published = Some(next.clone());
            *current = next;
        });

        tracing::debug!(
            "Navigated to {} ({})",
            path,
            published
                .as_ref()
                .map(|route| route.resolution.view.name())
                .unwrap_or("unknown")
        );

        published.unwrap_or_else(|| self.current())
    }
}
