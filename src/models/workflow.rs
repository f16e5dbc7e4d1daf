use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::navigation::WorkflowIdentity;

/// Overall state of one workflow execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Running,
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Running => "running",
            WorkflowStatus::Succeeded => "succeeded",
            WorkflowStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One run of the upgrade automation on one host
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowExecution {
    pub identity: WorkflowIdentity,
    pub region: Option<String>,
    pub workflow_type: String,
    pub release: Option<String>,
    pub started: Option<DateTime<Utc>>,
    pub finished: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub status: WorkflowStatus,
    pub failure_stage: Option<String>,
    pub failure_reason: Option<String>,
    pub automation_failure: bool,
    pub failed_validation: bool,
}

/// Kind and OS majors encoded in a workflow type such as `upgrade_7_to_8`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowKind<'a> {
    pub name: &'a str,
    pub from_major: u8,
    pub to_major: u8,
}

impl<'a> WorkflowKind<'a> {
    pub fn parse(workflow_type: &'a str) -> Option<Self> {
        let (rest, to_major) = workflow_type.rsplit_once("_to_")?;
        let (name, from_major) = rest.rsplit_once('_')?;
        Some(Self {
            name,
            from_major: from_major.parse().ok()?,
            to_major: to_major.parse().ok()?,
        })
    }

    pub fn is_upgrade(&self) -> bool {
        self.name == "upgrade"
    }
}

/// Filters accepted by the workflow list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFilter {
    /// Case-insensitive hostname substring
    pub hostname: Option<String>,
    pub region: Option<String>,
    pub workflow_type: Option<String>,
    pub failure_stage: Option<String>,
    /// Free text matched against failed task names and output
    pub error: Option<String>,
    pub started_from: Option<NaiveDate>,
    /// Inclusive
    pub started_to: Option<NaiveDate>,
    /// 1-based
    pub page: u32,
}

impl Default for WorkflowFilter {
    fn default() -> Self {
        Self {
            hostname: None,
            region: None,
            workflow_type: None,
            failure_stage: None,
            error: None,
            started_from: None,
            started_to: None,
            page: 1,
        }
    }
}

impl WorkflowFilter {
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        Self {
            page: self.page,
            ..Self::default()
        } == *self
    }

    /// Query-string pairs, without the page
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key, value: &Option<String>| {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        };
        push("hostname", &self.hostname);
        push("region", &self.region);
        push("workflow_type", &self.workflow_type);
        push("failure_stage", &self.failure_stage);
        push("error", &self.error);
        if let Some(from) = self.started_from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.started_to {
            pairs.push(("to", to.to_string()));
        }
        pairs
    }
}

/// Deepest hit the data service pages to (`index.max_result_window`)
pub const MAX_RESULT_WINDOW: u64 = 10_000;

/// Last page reachable with `page_size` rows per page
pub fn max_page(page_size: u32) -> u32 {
    let pages = MAX_RESULT_WINDOW / u64::from(page_size.max(1));
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

/// One page of the workflow list
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowPage {
    pub executions: Vec<WorkflowExecution>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl WorkflowPage {
    /// Pages that can be fetched, capped at the result window
    pub fn page_count(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size.max(1)));
        u32::try_from(pages)
            .unwrap_or(u32::MAX)
            .min(max_page(self.page_size))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }
}
