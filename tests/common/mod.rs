//! Test helpers shared by the integration tests.
//!
//! Provides a scripted in-memory data service that records every query it
//! receives, plus fixtures for one failed upgrade on `host01.example.com`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use tower::util::ServiceExt;

use leapp_reporting::endpoints::create_router;
use leapp_reporting::models::{
    AnalyticsAggregate, AnalyticsInterval, AnalyticsReport, FleetSummary, Host, Stage,
    StageStatus, StageTrace, TaskFailure, WorkflowExecution, WorkflowFilter, WorkflowPage,
    WorkflowStatus, WorkflowTypeBreakdown,
};
use leapp_reporting::navigation::WorkflowIdentity;
use leapp_reporting::services::{DataFetchError, DataResult, DataService, Snapshot};
use leapp_reporting::staleness::StalenessIndicator;
use leapp_reporting::state::AppState;

pub const HOST: &str = "host01.example.com";
pub const TX: &str = "3f9a-tx";
pub const PAGE_SIZE: u32 = 50;

/// One query received by the scripted service
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FleetSummary,
    ListWorkflows(WorkflowFilter),
    StageTrace(WorkflowIdentity),
    ListHosts,
    Analytics(AnalyticsInterval),
    Ping,
}

pub fn snapshot_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 40, 0).unwrap()
}

pub fn identity() -> WorkflowIdentity {
    WorkflowIdentity::new(HOST, TX).unwrap()
}

pub fn execution(identity: WorkflowIdentity, status: WorkflowStatus) -> WorkflowExecution {
    let failed = status == WorkflowStatus::Failed;
    WorkflowExecution {
        identity,
        region: Some("amrs".to_string()),
        workflow_type: "upgrade_7_to_8".to_string(),
        release: Some("8.10".to_string()),
        started: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
        finished: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
        last_updated: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
        status,
        failure_stage: failed.then(|| "leapp_upgrade_8.10".to_string()),
        failure_reason: failed.then(|| "Run leapp upgrade".to_string()),
        automation_failure: failed,
        failed_validation: false,
    }
}

fn stage(position: u32, name: &str, status: StageStatus) -> Stage {
    Stage {
        position,
        name: name.to_string(),
        status,
        started: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, position * 10, 0).unwrap()),
        finished: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, position * 10 + 5, 0).unwrap()),
        timed_out: false,
        failures: Vec::new(),
    }
}

/// Stages of the fixture execution, in execution order
pub fn stage_trace() -> StageTrace {
    let mut upgrade = stage(1, "leapp_upgrade_8.10", StageStatus::Failed);
    upgrade.failures.push(TaskFailure {
        task: "Run leapp upgrade".to_string(),
        message: Some("non-zero return code".to_string()),
        automation_failure: true,
    });

    StageTrace::new(
        execution(identity(), WorkflowStatus::Failed),
        vec![
            stage(0, "leapp_preupgrade_8.10", StageStatus::Succeeded),
            upgrade,
            stage(2, "vastool_revert_8.10", StageStatus::Succeeded),
        ],
    )
    .unwrap()
}

/// In-memory data service answering from fixtures
pub struct ScriptedDataService {
    executions: Vec<WorkflowExecution>,
    traces: HashMap<WorkflowIdentity, StageTrace>,
    hosts: Vec<Host>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedDataService {
    pub fn new() -> Self {
        let failed = execution(identity(), WorkflowStatus::Failed);
        let succeeded = execution(
            WorkflowIdentity::new("db02.example.com", "77b1-tx").unwrap(),
            WorkflowStatus::Succeeded,
        );

        let mut traces = HashMap::new();
        traces.insert(identity(), stage_trace());

        Self {
            hosts: vec![
                Host::from_latest(&succeeded, 2),
                Host::from_latest(&failed, 1),
            ],
            executions: vec![failed, succeeded],
            traces,
            failure: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every query fails as if the data service were down
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Every query takes `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_trace(mut self, trace: StageTrace) -> Self {
        let identity = trace.execution().identity.clone();
        self.executions.push(trace.execution().clone());
        self.traces.insert(identity, trace);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    async fn answer<T>(&self, call: Call, data: impl FnOnce() -> T) -> DataResult<T> {
        self.calls.lock().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(DataFetchError::Unavailable(message.clone())),
            None => Ok(Snapshot::new(data(), Some(snapshot_time()))),
        }
    }

    fn matching(&self, filter: &WorkflowFilter) -> Vec<WorkflowExecution> {
        self.executions
            .iter()
            .filter(|e| {
                filter.hostname.as_ref().map_or(true, |h| {
                    e.identity
                        .hostname()
                        .to_lowercase()
                        .contains(&h.to_lowercase())
                })
            })
            .filter(|e| {
                filter
                    .region
                    .as_ref()
                    .map_or(true, |r| e.region.as_ref() == Some(r))
            })
            .filter(|e| {
                filter
                    .workflow_type
                    .as_ref()
                    .map_or(true, |t| &e.workflow_type == t)
            })
            .cloned()
            .collect()
    }
}

impl Default for ScriptedDataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataService for ScriptedDataService {
    async fn fleet_summary(&self) -> DataResult<FleetSummary> {
        self.answer(Call::FleetSummary, || FleetSummary {
            total_workflows: self.executions.len() as u64,
            succeeded: 1,
            failed: 1,
            running: 0,
            automation_failures: 1,
            host_count: self.hosts.len() as u64,
            recent_failures: self
                .executions
                .iter()
                .filter(|e| e.status == WorkflowStatus::Failed)
                .cloned()
                .collect(),
        })
        .await
    }

    async fn list_workflows(&self, filter: &WorkflowFilter) -> DataResult<WorkflowPage> {
        self.answer(Call::ListWorkflows(filter.clone()), || {
            let matching = self.matching(filter);
            let skip = ((filter.page.max(1) - 1) * PAGE_SIZE) as usize;
            WorkflowPage {
                total: matching.len() as u64,
                executions: matching.into_iter().skip(skip).take(PAGE_SIZE as usize).collect(),
                page: filter.page.max(1),
                page_size: PAGE_SIZE,
            }
        })
        .await
    }

    async fn stage_trace(&self, identity: &WorkflowIdentity) -> DataResult<Option<StageTrace>> {
        self.answer(Call::StageTrace(identity.clone()), || {
            self.traces.get(identity).cloned()
        })
        .await
    }

    async fn list_hosts(&self) -> DataResult<Vec<Host>> {
        self.answer(Call::ListHosts, || self.hosts.clone()).await
    }

    async fn analytics(&self, interval: AnalyticsInterval) -> DataResult<AnalyticsReport> {
        self.answer(Call::Analytics(interval), || AnalyticsReport {
            interval,
            periods: vec![AnalyticsAggregate {
                period_start: Utc.with_ymd_and_hms(2024, 2, 26, 0, 0, 0).unwrap(),
                total: 2,
                succeeded: 1,
                failed: 1,
                running: 0,
            }],
            by_workflow_type: vec![WorkflowTypeBreakdown {
                workflow_type: "upgrade_7_to_8".to_string(),
                total: 2,
                failed: 1,
            }],
        })
        .await
    }

    async fn ping(&self) -> bool {
        self.calls.lock().push(Call::Ping);
        self.failure.is_none()
    }
}

/// Build the application state around a scripted service
pub fn build_test_app_state(service: Arc<ScriptedDataService>) -> AppState {
    AppState::new(service, Duration::from_secs(2), StalenessIndicator::default())
}

pub fn test_app(service: Arc<ScriptedDataService>) -> Router {
    create_router(build_test_app_state(service))
}

/// Send a request and collect status and body
pub async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body_bytes).to_string())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    send(app, "GET", uri).await
}

/// The `<main>` content region of a rendered page
pub fn content_region(page: &str) -> &str {
    let start = page.find("<main").unwrap_or(0);
    let end = page.find("</main>").unwrap_or(page.len());
    &page[start..end]
}
