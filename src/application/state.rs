use std::time::Duration;

use crate::services::SharedDataService;
use crate::staleness::StalenessIndicator;

/// Application state shared by every request. Immutable after startup;
/// each request builds its own route store.
#[derive(Clone)]
pub struct AppState {
    pub data: SharedDataService,
    /// Upper bound for one view's data fetch
    pub fetch_timeout: Duration,
    pub staleness: StalenessIndicator,
}

impl AppState {
    pub fn new(
        data: SharedDataService,
        fetch_timeout: Duration,
        staleness: StalenessIndicator,
    ) -> Self {
        Self {
            data,
            fetch_timeout,
            staleness,
        }
    }
}
