//! Boundary to the data service that owns hosts, workflow executions and
//! analytics. Every query is read-only and idempotent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    AnalyticsInterval, AnalyticsReport, FleetSummary, Host, StageOrderError, StageTrace,
    WorkflowFilter, WorkflowPage,
};
use crate::navigation::WorkflowIdentity;

#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("data service unavailable: {0}")]
    Unavailable(String),

    #[error("data service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("data service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode data service response: {0}")]
    Decode(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl DataFetchError {
    /// Worth retrying: transport problems and server-side failures
    pub fn is_transient(&self) -> bool {
        match self {
            DataFetchError::Unavailable(_) | DataFetchError::Timeout(_) => true,
            DataFetchError::Status { status, .. } => *status >= 500,
            DataFetchError::Http(e) => e.is_connect() || e.is_timeout(),
            DataFetchError::Decode(_) | DataFetchError::InvalidRecord(_) => false,
        }
    }
}

impl From<StageOrderError> for DataFetchError {
    fn from(e: StageOrderError) -> Self {
        DataFetchError::InvalidRecord(e.to_string())
    }
}

impl From<serde_json::Error> for DataFetchError {
    fn from(e: serde_json::Error) -> Self {
        DataFetchError::Decode(e.to_string())
    }
}

/// A data-service answer and, when known, the time of the newest record in it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub data: T,
    pub taken_at: Option<DateTime<Utc>>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T, taken_at: Option<DateTime<Utc>>) -> Self {
        Self { data, taken_at }
    }

    pub fn undated(data: T) -> Self {
        Self::new(data, None)
    }
}

pub type DataResult<T> = Result<Snapshot<T>, DataFetchError>;

#[async_trait]
pub trait DataService: Send + Sync {
    async fn fleet_summary(&self) -> DataResult<FleetSummary>;

    async fn list_workflows(&self, filter: &WorkflowFilter) -> DataResult<WorkflowPage>;

    /// `None` when no execution exists for the identity
    async fn stage_trace(&self, identity: &WorkflowIdentity) -> DataResult<Option<StageTrace>>;

    async fn list_hosts(&self) -> DataResult<Vec<Host>>;

    async fn analytics(&self, interval: AnalyticsInterval) -> DataResult<AnalyticsReport>;

    /// Whether the service answers at all
    async fn ping(&self) -> bool;
}

pub type SharedDataService = Arc<dyn DataService>;
