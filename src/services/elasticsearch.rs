//! Elasticsearch-backed data service.
//!
//! The ingestion pipeline stores one document per workflow execution in a
//! single index, keyed `{txId}-{hostname}`, with the playbook runs of the
//! execution in `jobs` in the order they ran. Rollups (host list, analytics,
//! dashboard counts) are computed by Elasticsearch aggregations.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::config::datasource::DataSourceConfig;
use crate::models::{
    max_page, AnalyticsAggregate, AnalyticsInterval, AnalyticsReport, FleetSummary, Host, Stage,
    StageStatus, StageTrace, TaskFailure, WorkflowExecution, WorkflowFilter, WorkflowPage,
    WorkflowStatus, WorkflowTypeBreakdown, MAX_RESULT_WINDOW,
};
use crate::navigation::WorkflowIdentity;

use super::data::{DataFetchError, DataResult, DataService, Snapshot};

const HOST_FIELD: &str = "limit.keyword";
const REGION_FIELD: &str = "region.keyword";
const TYPE_FIELD: &str = "workflow_type.keyword";
const STATUS_FIELD: &str = "workflow_status.keyword";

/// Recent failures shown on the dashboard
const RECENT_FAILURES: usize = 5;

/// First retry delay; doubles per attempt
const RETRY_BASE: Duration = Duration::from_millis(200);

/// Longest failed-task message kept for display
const MESSAGE_LIMIT: usize = 500;

// ============================================================================
// Index documents
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub id: String,
    /// Hostname the automation was limited to
    #[serde(default)]
    pub limit: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub workflow_type: String,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub finished: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub automation_failure: bool,
    #[serde(default)]
    pub failed_validation: bool,
    #[serde(default)]
    pub workflow_status: Option<String>,
    #[serde(default)]
    pub jobs: Vec<JobDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub failed: bool,
    #[serde(default, deserialize_with = "lenient_time")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub finished: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub extra_vars: Value,
    #[serde(default)]
    pub failed_tasks: Vec<FailedTaskDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FailedTaskDocument {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub event_display: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub event_data: Value,
    #[serde(default)]
    pub automation_failure: Option<bool>,
}

fn lenient_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(parse_time))
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|t| t.and_utc())
            }),
        Value::Number(n) => n.as_f64().and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        _ => None,
    }
}

impl JobDocument {
    /// Value of an extra var; older documents keep `extra_vars` as a JSON string
    fn extra_var(&self, key: &str) -> Option<String> {
        let parsed;
        let vars = match &self.extra_vars {
            Value::String(raw) => {
                parsed = serde_json::from_str::<Value>(raw).ok()?;
                &parsed
            }
            other => other,
        };
        match vars.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn is_failed(&self) -> bool {
        self.failed || StageStatus::from_job_status(&self.status) == StageStatus::Failed
    }
}

impl FailedTaskDocument {
    fn to_failure(&self) -> TaskFailure {
        let task = self
            .task
            .clone()
            .or_else(|| self.event_display.clone())
            .unwrap_or_else(|| "Unnamed task".to_string());

        let message = self
            .event_data
            .pointer("/res/msg")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.stdout.clone())
            .map(|m| truncate(m.trim(), MESSAGE_LIMIT))
            .filter(|m| !m.is_empty());

        TaskFailure {
            task,
            message,
            automation_failure: self.automation_failure.unwrap_or(true),
        }
    }
}

impl WorkflowDocument {
    fn transaction_id(&self) -> Option<String> {
        self.jobs
            .first()
            .and_then(|job| job.extra_var("txId"))
            .or_else(|| {
                self.id
                    .strip_suffix(&format!("-{}", self.limit))
                    .map(str::to_string)
            })
    }

    pub fn identity(&self) -> Result<WorkflowIdentity, DataFetchError> {
        let transaction_id = self.transaction_id().unwrap_or_default();
        WorkflowIdentity::new(self.limit.clone(), transaction_id).map_err(|e| {
            DataFetchError::InvalidRecord(format!("document {:?}: {}", self.id, e))
        })
    }

    pub fn status(&self) -> WorkflowStatus {
        if self.failed {
            WorkflowStatus::Failed
        } else if self.workflow_status.as_deref() == Some("completed") {
            WorkflowStatus::Succeeded
        } else {
            WorkflowStatus::Running
        }
    }

    pub fn to_execution(&self) -> Result<WorkflowExecution, DataFetchError> {
        let failed_job = self.jobs.iter().find(|job| job.is_failed());

        let failure_reason = failed_job.and_then(|job| {
            job.failed_tasks
                .first()
                .map(|task| task.to_failure().task)
                .or_else(|| job.timed_out.then(|| "Timed out".to_string()))
        });

        Ok(WorkflowExecution {
            identity: self.identity()?,
            region: self.region.clone(),
            workflow_type: self.workflow_type.clone(),
            release: self.release.clone(),
            started: self.started,
            finished: self.finished,
            last_updated: self.last_updated,
            status: self.status(),
            failure_stage: failed_job.map(|job| job.name.clone()),
            failure_reason,
            automation_failure: self.automation_failure,
            failed_validation: self.failed_validation,
        })
    }

    /// Stages in the order the jobs ran
    pub fn to_stage_trace(&self) -> Result<StageTrace, DataFetchError> {
        let stages = self
            .jobs
            .iter()
            .enumerate()
            .map(|(index, job)| Stage {
                position: u32::try_from(index).unwrap_or(u32::MAX),
                name: job.name.clone(),
                status: StageStatus::from_job_status(&job.status),
                started: job.started,
                finished: job.finished,
                timed_out: job.timed_out,
                failures: job
                    .failed_tasks
                    .iter()
                    .map(FailedTaskDocument::to_failure)
                    .collect(),
            })
            .collect();

        Ok(StageTrace::new(self.to_execution()?, stages)?)
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
    #[serde(default)]
    aggregations: Value,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: WorkflowDocument,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<WorkflowDocument>,
}

fn doc_count(aggs: &Value, name: &str) -> u64 {
    aggs[name]["doc_count"].as_u64().unwrap_or(0)
}

fn metric_u64(aggs: &Value, name: &str) -> u64 {
    aggs[name]["value"].as_f64().map(|v| v as u64).unwrap_or(0)
}

/// `max(last_updated)` over the queried documents
fn snapshot_time(aggs: &Value) -> Option<DateTime<Utc>> {
    aggs["snapshot"]["value"]
        .as_f64()
        .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
}

/// Convert documents, skipping (and logging) records that cannot be named
fn executions_from_hits(hits: &[Hit]) -> Vec<WorkflowExecution> {
    hits.iter()
        .filter_map(|hit| match hit.source.to_execution() {
            Ok(execution) => Some(execution),
            Err(e) => {
                tracing::warn!("Skipping workflow document: {}", e);
                None
            }
        })
        .collect()
}

fn parse_summary(response: &SearchResponse) -> Snapshot<FleetSummary> {
    let aggs = &response.aggregations;
    let summary = FleetSummary {
        total_workflows: doc_count(aggs, "all"),
        succeeded: doc_count(aggs, "succeeded"),
        failed: doc_count(aggs, "failed"),
        running: doc_count(aggs, "running"),
        automation_failures: doc_count(aggs, "automation_failures"),
        host_count: metric_u64(aggs, "hosts"),
        recent_failures: executions_from_hits(&response.hits.hits),
    };
    Snapshot::new(summary, snapshot_time(aggs))
}

fn parse_workflow_page(
    response: &SearchResponse,
    page: u32,
    page_size: u32,
) -> Snapshot<WorkflowPage> {
    let executions = executions_from_hits(&response.hits.hits);
    let total = response
        .hits
        .total
        .as_ref()
        .map(|t| t.value)
        .unwrap_or(executions.len() as u64);

    Snapshot::new(
        WorkflowPage {
            executions,
            total,
            page,
            page_size,
        },
        snapshot_time(&response.aggregations),
    )
}

fn parse_hosts(response: &SearchResponse) -> Snapshot<Vec<Host>> {
    let aggs = &response.aggregations;
    let buckets = aggs["hosts"]["buckets"].as_array().cloned().unwrap_or_default();

    let hosts = buckets
        .iter()
        .filter_map(|bucket| {
            let source = bucket.pointer("/latest/hits/hits/0/_source")?;
            let document: WorkflowDocument = match serde_json::from_value(source.clone()) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping host bucket {}: {}", bucket["key"], e);
                    return None;
                }
            };
            match document.to_execution() {
                Ok(latest) => Some(Host::from_latest(
                    &latest,
                    bucket["doc_count"].as_u64().unwrap_or(0),
                )),
                Err(e) => {
                    tracing::warn!("Skipping host bucket {}: {}", bucket["key"], e);
                    None
                }
            }
        })
        .collect();

    Snapshot::new(hosts, snapshot_time(aggs))
}

fn parse_analytics(response: &SearchResponse, interval: AnalyticsInterval) -> Snapshot<AnalyticsReport> {
    let aggs = &response.aggregations;

    let periods = aggs["per_period"]["buckets"]
        .as_array()
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| {
                    let period_start = parse_time(&bucket["key"])?;
                    Some(AnalyticsAggregate {
                        period_start,
                        total: bucket["doc_count"].as_u64().unwrap_or(0),
                        succeeded: doc_count(bucket, "succeeded"),
                        failed: doc_count(bucket, "failed"),
                        running: doc_count(bucket, "running"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let by_workflow_type = aggs["by_type"]["buckets"]
        .as_array()
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| {
                    Some(WorkflowTypeBreakdown {
                        workflow_type: bucket["key"].as_str()?.to_string(),
                        total: bucket["doc_count"].as_u64().unwrap_or(0),
                        failed: doc_count(bucket, "failed"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Snapshot::new(
        AnalyticsReport {
            interval,
            periods,
            by_workflow_type,
        },
        snapshot_time(aggs),
    )
}

/// Stage trace of `document`, dated by its `last_updated`
fn parse_stage_trace(
    document: &WorkflowDocument,
    identity: &WorkflowIdentity,
) -> DataResult<Option<StageTrace>> {
    let trace = document.to_stage_trace()?;
    if trace.execution().identity != *identity {
        return Err(DataFetchError::InvalidRecord(format!(
            "document {} belongs to {}",
            identity.document_id(),
            trace.execution().identity
        )));
    }

    let taken_at = trace.execution().last_updated;
    Ok(Snapshot::new(Some(trace), taken_at))
}

// ============================================================================
// Query bodies
// ============================================================================

fn succeeded_query() -> Value {
    json!({
        "bool": {
            "filter": [
                { "term": { "failed": false } },
                { "term": { STATUS_FIELD: "completed" } }
            ]
        }
    })
}

fn running_query() -> Value {
    json!({
        "bool": {
            "filter": [{ "term": { "failed": false } }],
            "must_not": [{ "term": { STATUS_FIELD: "completed" } }]
        }
    })
}

fn snapshot_agg() -> Value {
    json!({ "max": { "field": "last_updated" } })
}

fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '*' | '?') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bool query for the workflow list filters
pub fn workflow_query(filter: &WorkflowFilter) -> Value {
    let mut clauses = Vec::new();

    if let Some(hostname) = &filter.hostname {
        clauses.push(json!({
            "wildcard": {
                HOST_FIELD: {
                    "value": format!("*{}*", escape_wildcard(hostname)),
                    "case_insensitive": true
                }
            }
        }));
    }
    if let Some(region) = &filter.region {
        clauses.push(json!({ "term": { REGION_FIELD: region } }));
    }
    if let Some(workflow_type) = &filter.workflow_type {
        clauses.push(json!({ "term": { TYPE_FIELD: workflow_type } }));
    }
    if let Some(stage) = &filter.failure_stage {
        clauses.push(json!({ "term": { "failed": true } }));
        clauses.push(json!({ "match_phrase": { "jobs.name": stage } }));
    }
    if let Some(error) = &filter.error {
        clauses.push(json!({
            "multi_match": {
                "query": error,
                "type": "phrase",
                "fields": [
                    "jobs.failed_tasks.task",
                    "jobs.failed_tasks.stdout",
                    "jobs.failed_tasks.event_data.res.msg"
                ]
            }
        }));
    }

    let mut range = serde_json::Map::new();
    if let Some(from) = filter.started_from {
        range.insert("gte".to_string(), json!(from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = filter.started_to {
        // Inclusive end date: everything before the following midnight
        let end = to.succ_opt().unwrap_or(to);
        range.insert("lt".to_string(), json!(end.format("%Y-%m-%d").to_string()));
    }
    if !range.is_empty() {
        clauses.push(json!({ "range": { "started": range } }));
    }

    if clauses.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({ "bool": { "filter": clauses } })
    }
}

/// Page actually fetched for `filter`; pages past the result window fall back to the last one
pub fn effective_page(filter: &WorkflowFilter, page_size: u32) -> u32 {
    filter.page.clamp(1, max_page(page_size))
}

pub fn workflow_list_body(filter: &WorkflowFilter, page_size: u32) -> Value {
    let page = effective_page(filter, page_size);
    let size = u64::from(page_size).min(MAX_RESULT_WINDOW);
    json!({
        "query": workflow_query(filter),
        "from": u64::from(page - 1) * size,
        "size": size,
        "track_total_hits": true,
        "sort": [{ "started": { "order": "desc", "unmapped_type": "date" } }],
        "aggs": { "snapshot": snapshot_agg() }
    })
}

pub fn fleet_summary_body() -> Value {
    json!({
        "size": RECENT_FAILURES,
        "sort": [{ "started": { "order": "desc", "unmapped_type": "date" } }],
        // Hits are narrowed to failures; aggregations still see everything
        "post_filter": { "term": { "failed": true } },
        "aggs": {
            "all": { "filter": { "match_all": {} } },
            "succeeded": { "filter": succeeded_query() },
            "failed": { "filter": { "term": { "failed": true } } },
            "running": { "filter": running_query() },
            "automation_failures": { "filter": { "term": { "automation_failure": true } } },
            "hosts": { "cardinality": { "field": HOST_FIELD } },
            "snapshot": snapshot_agg()
        }
    })
}

pub fn hosts_body(limit: u32) -> Value {
    json!({
        "size": 0,
        "aggs": {
            "hosts": {
                "terms": { "field": HOST_FIELD, "size": limit, "order": { "_key": "asc" } },
                "aggs": {
                    "latest": {
                        "top_hits": {
                            "size": 1,
                            "sort": [{ "started": { "order": "desc", "unmapped_type": "date" } }],
                            "_source": { "excludes": ["jobs"] }
                        }
                    }
                }
            },
            "snapshot": snapshot_agg()
        }
    })
}

pub fn analytics_body(interval: AnalyticsInterval) -> Value {
    json!({
        "size": 0,
        "aggs": {
            "per_period": {
                "date_histogram": {
                    "field": "started",
                    "calendar_interval": interval.as_str(),
                    "min_doc_count": 0
                },
                "aggs": {
                    "succeeded": { "filter": succeeded_query() },
                    "failed": { "filter": { "term": { "failed": true } } },
                    "running": { "filter": running_query() }
                }
            },
            "by_type": {
                "terms": { "field": TYPE_FIELD, "size": 50 },
                "aggs": {
                    "failed": { "filter": { "term": { "failed": true } } }
                }
            },
            "snapshot": snapshot_agg()
        }
    })
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct ElasticsearchDataService {
    client: reqwest::Client,
    base_url: String,
    index: String,
    page_size: u32,
    host_limit: u32,
    retries: u32,
}

impl ElasticsearchDataService {
    pub fn new(config: &DataSourceConfig) -> Result<Self, DataFetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.elasticsearch_url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            page_size: config.page_size,
            host_limit: config.host_limit,
            retries: config.retries,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Run `op`, retrying transient failures with exponential backoff
    async fn with_retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, DataFetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DataFetchError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    let wait = RETRY_BASE * 2u32.pow(attempt);
                    tracing::warn!(
                        "Elasticsearch {} failed, retrying in {:?}: {}",
                        what,
                        wait,
                        e
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn search(&self, what: &str, body: &Value) -> Result<SearchResponse, DataFetchError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let url = url.as_str();

        self.with_retry(what, || async move {
            let response = self.client.post(url).json(body).send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;

            if !status.is_success() {
                return Err(DataFetchError::Status {
                    status: status.as_u16(),
                    body: truncate(&String::from_utf8_lossy(&bytes), MESSAGE_LIMIT),
                });
            }

            Ok(serde_json::from_slice::<SearchResponse>(&bytes)?)
        })
        .await
    }

    async fn get_document(&self, id: &str) -> Result<Option<WorkflowDocument>, DataFetchError> {
        let url = format!(
            "{}/{}/_doc/{}",
            self.base_url,
            self.index,
            urlencoding::encode(id)
        );
        let url = url.as_str();

        self.with_retry("document lookup", || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;

            if status == reqwest::StatusCode::NOT_FOUND {
                // A missing document answers {"found": false}; a missing index
                // answers with an error body and is a real failure
                return match serde_json::from_slice::<GetResponse>(&bytes) {
                    Ok(found) if !found.found => Ok(None),
                    _ => Err(DataFetchError::Status {
                        status: status.as_u16(),
                        body: truncate(&String::from_utf8_lossy(&bytes), MESSAGE_LIMIT),
                    }),
                };
            }
            if !status.is_success() {
                return Err(DataFetchError::Status {
                    status: status.as_u16(),
                    body: truncate(&String::from_utf8_lossy(&bytes), MESSAGE_LIMIT),
                });
            }

            let found: GetResponse = serde_json::from_slice(&bytes)?;
            Ok(found.source.filter(|_| found.found))
        })
        .await
    }
}

#[async_trait]
impl DataService for ElasticsearchDataService {
    async fn fleet_summary(&self) -> DataResult<FleetSummary> {
        let response = self.search("fleet summary", &fleet_summary_body()).await?;
        Ok(parse_summary(&response))
    }

    async fn list_workflows(&self, filter: &WorkflowFilter) -> DataResult<WorkflowPage> {
        let body = workflow_list_body(filter, self.page_size);
        let response = self.search("workflow list", &body).await?;
        Ok(parse_workflow_page(
            &response,
            effective_page(filter, self.page_size),
            self.page_size,
        ))
    }

    async fn stage_trace(&self, identity: &WorkflowIdentity) -> DataResult<Option<StageTrace>> {
        let Some(document) = self.get_document(&identity.document_id()).await? else {
            return Ok(Snapshot::undated(None));
        };

        parse_stage_trace(&document, identity)
    }

    async fn list_hosts(&self) -> DataResult<Vec<Host>> {
        let response = self.search("host list", &hosts_body(self.host_limit)).await?;
        Ok(parse_hosts(&response))
    }

    async fn analytics(&self, interval: AnalyticsInterval) -> DataResult<AnalyticsReport> {
        let response = self.search("analytics", &analytics_body(interval)).await?;
        Ok(parse_analytics(&response, interval))
    }

    async fn ping(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Elasticsearch ping failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn upgrade_document() -> Value {
        json!({
            "id": "3f9a-tx-host01.example.com",
            "limit": "host01.example.com",
            "region": "amrs",
            "workflow_type": "upgrade_7_to_8",
            "release": "8.10",
            "started": "2024-03-01T10:00:00.000000+00:00",
            "finished": "2024-03-01T12:30:00.000000+00:00",
            "last_updated": "2024-03-01T12:30:00.000000+00:00",
            "failed": true,
            "automation_failure": true,
            "failed_validation": false,
            "workflow_status": "completed",
            "jobs": [
                {
                    "id": 101,
                    "name": "leapp_preupgrade_8.10",
                    "status": "successful",
                    "failed": false,
                    "started": "2024-03-01T10:00:05.000000+00:00",
                    "finished": "2024-03-01T10:40:00.000000+00:00",
                    "timed_out": false,
                    "extra_vars": { "txId": "3f9a-tx", "major_workflow": "upgrade_7_to_8" },
                    "failed_tasks": []
                },
                {
                    "id": 102,
                    "name": "leapp_upgrade_8.10",
                    "status": "failed",
                    "failed": true,
                    "started": "2024-03-01T11:00:00.000000+00:00",
                    "finished": "2024-03-01T12:30:00.000000+00:00",
                    "timed_out": false,
                    "extra_vars": { "txId": "3f9a-tx" },
                    "failed_tasks": [
                        {
                            "task": "Run leapp upgrade",
                            "stdout": "fatal: [host01]: FAILED!",
                            "event_data": { "res": { "msg": "non-zero return code" } },
                            "automation_failure": true
                        }
                    ]
                },
                {
                    "id": 103,
                    "name": "vastool_revert_8.10",
                    "status": "successful",
                    "failed": false,
                    "extra_vars": "{\"txId\": \"3f9a-tx\"}",
                    "failed_tasks": []
                }
            ]
        })
    }

    fn document() -> WorkflowDocument {
        serde_json::from_value(upgrade_document()).unwrap()
    }

    #[test]
    fn test_document_identity_from_extra_vars() {
        let identity = document().identity().unwrap();
        assert_eq!(identity.hostname(), "host01.example.com");
        assert_eq!(identity.transaction_id(), "3f9a-tx");
    }

    #[test]
    fn test_document_identity_from_id_suffix() {
        let mut doc = document();
        doc.jobs.clear();
        let identity = doc.identity().unwrap();
        assert_eq!(identity.transaction_id(), "3f9a-tx");
    }

    #[test]
    fn test_document_without_hostname_is_invalid() {
        let mut doc = document();
        doc.limit.clear();
        assert!(matches!(doc.identity(), Err(DataFetchError::InvalidRecord(_))));
    }

    #[test]
    fn test_execution_failure_fields() {
        let execution = document().to_execution().unwrap();
        assert_eq!(execution.status, WorkflowStatus::Failed);
        assert_eq!(execution.failure_stage.as_deref(), Some("leapp_upgrade_8.10"));
        assert_eq!(execution.failure_reason.as_deref(), Some("Run leapp upgrade"));
        assert_eq!(
            execution.started,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_status_mapping() {
        let mut doc = document();
        doc.failed = false;
        assert_eq!(doc.status(), WorkflowStatus::Succeeded);
        doc.workflow_status = Some("in_progress".to_string());
        assert_eq!(doc.status(), WorkflowStatus::Running);
    }

    #[test]
    fn test_stage_trace_follows_job_order() {
        let trace = document().to_stage_trace().unwrap();
        let names: Vec<&str> = trace.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["leapp_preupgrade_8.10", "leapp_upgrade_8.10", "vastool_revert_8.10"]
        );
        let failed = &trace.stages()[1];
        assert_eq!(failed.status, StageStatus::Failed);
        assert_eq!(
            failed.failures[0].message.as_deref(),
            Some("non-zero return code")
        );
        assert_eq!(trace.stages()[2].started, None);
    }

    #[test]
    fn test_parse_time_variants() {
        assert!(parse_time(&json!("2024-03-01T10:00:00+00:00")).is_some());
        assert!(parse_time(&json!("2024-03-01T10:00:00.123456")).is_some());
        assert_eq!(
            parse_time(&json!(1709287200000i64)),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert!(parse_time(&json!("yesterday")).is_none());
        assert!(parse_time(&Value::Null).is_none());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }

    #[test]
    fn test_workflow_query_empty_filter() {
        assert_eq!(workflow_query(&WorkflowFilter::default()), json!({ "match_all": {} }));
    }

    #[test]
    fn test_workflow_query_filters() {
        let filter = WorkflowFilter {
            hostname: Some("web*01".to_string()),
            region: Some("emea".to_string()),
            started_from: NaiveDate::from_ymd_opt(2024, 2, 1),
            started_to: NaiveDate::from_ymd_opt(2024, 2, 29),
            ..WorkflowFilter::default()
        };
        let query = workflow_query(&filter);
        let clauses = query["bool"]["filter"].as_array().unwrap();

        assert_eq!(
            clauses[0]["wildcard"][HOST_FIELD]["value"],
            json!("*web\\*01*")
        );
        assert_eq!(clauses[1]["term"][REGION_FIELD], json!("emea"));
        assert_eq!(clauses[2]["range"]["started"]["gte"], json!("2024-02-01"));
        assert_eq!(clauses[2]["range"]["started"]["lt"], json!("2024-03-01"));
    }

    #[test]
    fn test_failure_stage_filter_requires_failed() {
        let filter = WorkflowFilter {
            failure_stage: Some("leapp_upgrade".to_string()),
            ..WorkflowFilter::default()
        };
        let query = workflow_query(&filter);
        let clauses = query["bool"]["filter"].as_array().unwrap();
        assert_eq!(clauses[0], json!({ "term": { "failed": true } }));
        assert_eq!(clauses[1]["match_phrase"]["jobs.name"], json!("leapp_upgrade"));
    }

    #[test]
    fn test_list_body_paging() {
        let filter = WorkflowFilter {
            page: 3,
            ..WorkflowFilter::default()
        };
        let body = workflow_list_body(&filter, 50);
        assert_eq!(body["from"], json!(100));
        assert_eq!(body["size"], json!(50));
    }

    #[test]
    fn test_list_body_stays_inside_result_window() {
        for page in [200, 201, 5_000] {
            let filter = WorkflowFilter {
                page,
                ..WorkflowFilter::default()
            };
            let body = workflow_list_body(&filter, 50);
            let from = body["from"].as_u64().unwrap();
            let size = body["size"].as_u64().unwrap();
            assert!(from + size <= MAX_RESULT_WINDOW, "page {}: {}", page, from + size);
            assert_eq!(from, 9_950);
        }

        let filter = WorkflowFilter {
            page: 201,
            ..WorkflowFilter::default()
        };
        assert_eq!(effective_page(&filter, 50), 200);
    }

    #[test]
    fn test_stage_trace_is_dated_by_last_updated() {
        let identity = WorkflowIdentity::new("host01.example.com", "3f9a-tx").unwrap();
        let snapshot = parse_stage_trace(&document(), &identity).unwrap();

        assert!(snapshot.data.is_some());
        assert_eq!(
            snapshot.taken_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_stage_trace_of_other_identity_is_invalid() {
        let identity = WorkflowIdentity::new("host02.example.com", "3f9a-tx").unwrap();
        assert!(matches!(
            parse_stage_trace(&document(), &identity),
            Err(DataFetchError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_parse_workflow_page() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {
                "total": { "value": 77, "relation": "eq" },
                "hits": [
                    { "_id": "3f9a-tx-host01.example.com", "_source": upgrade_document() },
                    { "_id": "broken", "_source": { "id": "broken" } }
                ]
            },
            "aggregations": { "snapshot": { "value": 1709287200000.0 } }
        }))
        .unwrap();

        let snapshot = parse_workflow_page(&response, 2, 50);
        assert_eq!(snapshot.data.total, 77);
        assert_eq!(snapshot.data.page, 2);
        assert_eq!(snapshot.data.executions.len(), 1);
        assert_eq!(
            snapshot.taken_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_summary() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": { "hits": [ { "_source": upgrade_document() } ] },
            "aggregations": {
                "all": { "doc_count": 120 },
                "succeeded": { "doc_count": 90 },
                "failed": { "doc_count": 25 },
                "running": { "doc_count": 5 },
                "automation_failures": { "doc_count": 7 },
                "hosts": { "value": 64 },
                "snapshot": { "value": null }
            }
        }))
        .unwrap();

        let snapshot = parse_summary(&response);
        assert_eq!(snapshot.data.total_workflows, 120);
        assert_eq!(snapshot.data.succeeded, 90);
        assert_eq!(snapshot.data.failed, 25);
        assert_eq!(snapshot.data.running, 5);
        assert_eq!(snapshot.data.automation_failures, 7);
        assert_eq!(snapshot.data.host_count, 64);
        assert_eq!(snapshot.data.recent_failures.len(), 1);
        assert_eq!(snapshot.taken_at, None);
    }

    #[test]
    fn test_parse_hosts() {
        let mut latest = upgrade_document();
        latest.as_object_mut().unwrap().remove("jobs");

        let response: SearchResponse = serde_json::from_value(json!({
            "hits": { "hits": [] },
            "aggregations": {
                "hosts": {
                    "buckets": [
                        {
                            "key": "host01.example.com",
                            "doc_count": 4,
                            "latest": { "hits": { "hits": [ { "_source": latest } ] } }
                        },
                        { "key": "empty", "doc_count": 1, "latest": { "hits": { "hits": [] } } }
                    ]
                }
            }
        }))
        .unwrap();

        let hosts = parse_hosts(&response).data;
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].hostname, "host01.example.com");
        assert_eq!(hosts[0].workflow_count, 4);
        assert_eq!(hosts[0].os_major, Some(7));
        assert_eq!(
            hosts[0].latest.as_ref().unwrap().transaction_id(),
            "3f9a-tx"
        );
    }

    #[test]
    fn test_parse_analytics() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": { "hits": [] },
            "aggregations": {
                "per_period": {
                    "buckets": [
                        {
                            "key_as_string": "2024-02-26T00:00:00.000Z",
                            "key": 1708905600000i64,
                            "doc_count": 10,
                            "succeeded": { "doc_count": 6 },
                            "failed": { "doc_count": 3 },
                            "running": { "doc_count": 1 }
                        }
                    ]
                },
                "by_type": {
                    "buckets": [
                        { "key": "upgrade_7_to_8", "doc_count": 8, "failed": { "doc_count": 3 } }
                    ]
                }
            }
        }))
        .unwrap();

        let report = parse_analytics(&response, AnalyticsInterval::Week).data;
        assert_eq!(report.periods.len(), 1);
        assert_eq!(report.periods[0].total, 10);
        assert_eq!(report.periods[0].succeeded, 6);
        assert_eq!(report.periods[0].failed, 3);
        assert_eq!(report.periods[0].running, 1);
        assert_eq!(report.by_workflow_type[0].workflow_type, "upgrade_7_to_8");
        assert_eq!(report.by_workflow_type[0].failed, 3);
        assert_eq!(report.peak_total(), 10);
    }

    #[test]
    fn test_analytics_body_interval() {
        let body = analytics_body(AnalyticsInterval::Month);
        assert_eq!(
            body["aggs"]["per_period"]["date_histogram"]["calendar_interval"],
            json!("month")
        );
    }
}
