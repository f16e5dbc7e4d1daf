//! Route-scoped data loading.
//!
//! A view's fetch belongs to the route that started it. Navigating away
//! cancels the fetch, and a result that arrives after the route changed is
//! discarded rather than rendered.

use std::future::Future;
use std::time::Duration;

use crate::navigation::{RouteStore, VersionedRoute};
use crate::services::DataFetchError;

#[derive(Debug)]
pub enum ViewLoad<T> {
    Ready(T),
    Failed(DataFetchError),
    /// The route was navigated away from; nothing may be rendered from it
    Superseded,
}

impl<T> ViewLoad<T> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, ViewLoad::Superseded)
    }
}

pub async fn load_view<T, F>(
    store: &RouteStore,
    route: &VersionedRoute,
    timeout: Duration,
    fetch: F,
) -> ViewLoad<T>
where
    F: Future<Output = Result<T, DataFetchError>>,
{
    let outcome = tokio::select! {
        biased;
        _ = route.superseded() => {
            tracing::debug!("Dropped fetch for superseded route v{}", route.version);
            return ViewLoad::Superseded;
        }
        result = tokio::time::timeout(timeout, fetch) => result,
    };

    // The route may have changed between completion and this check
    if !store.is_current(route.version) {
        tracing::debug!("Discarded late result for route v{}", route.version);
        return ViewLoad::Superseded;
    }

    match outcome {
        Ok(Ok(value)) => ViewLoad::Ready(value),
        Ok(Err(e)) => {
            tracing::warn!("Data fetch for {} failed: {}", route.resolution.path, e);
            ViewLoad::Failed(e)
        }
        Err(_) => {
            tracing::warn!(
                "Data fetch for {} timed out after {:?}",
                route.resolution.path,
                timeout
            );
            ViewLoad::Failed(DataFetchError::Timeout(timeout))
        }
    }
}
