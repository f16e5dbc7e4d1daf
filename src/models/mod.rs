//! Read-only records rendered by the dashboard. All of them are owned by the
//! data service; the dashboard only holds render-scoped copies.

pub mod analytics;
pub mod host;
pub mod stage;
pub mod workflow;

pub use analytics::{AnalyticsAggregate, AnalyticsInterval, AnalyticsReport, WorkflowTypeBreakdown};
pub use host::{Host, HostReadiness};
pub use stage::{Stage, StageOrderError, StageStatus, StageTrace, TaskFailure};
pub use workflow::{
    max_page, WorkflowExecution, WorkflowFilter, WorkflowKind, WorkflowPage, WorkflowStatus,
    MAX_RESULT_WINDOW,
};

/// Fleet-wide rollup shown on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSummary {
    pub total_workflows: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub running: u64,
    pub automation_failures: u64,
    pub host_count: u64,
    pub recent_failures: Vec<WorkflowExecution>,
}
