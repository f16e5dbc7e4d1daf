use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::workflow::WorkflowExecution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Succeeded,
    Failed,
    Running,
    Canceled,
    Unknown,
}

impl StageStatus {
    /// Map an automation-platform job status
    pub fn from_job_status(status: &str) -> Self {
        match status {
            "successful" => StageStatus::Succeeded,
            "failed" | "error" => StageStatus::Failed,
            "running" | "pending" | "waiting" | "new" => StageStatus::Running,
            "canceled" => StageStatus::Canceled,
            _ => StageStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Succeeded => "succeeded",
            StageStatus::Failed => "failed",
            StageStatus::Running => "running",
            StageStatus::Canceled => "canceled",
            StageStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task that failed inside a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: String,
    pub message: Option<String>,
    /// False for failures the automation raises on purpose (inhibitors, NFS mounts, ...)
    pub automation_failure: bool,
}

/// One step of a workflow execution
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub position: u32,
    pub name: String,
    pub status: StageStatus,
    pub started: Option<DateTime<Utc>>,
    pub finished: Option<DateTime<Utc>>,
    pub timed_out: bool,
    pub failures: Vec<TaskFailure>,
}

impl Stage {
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started, self.finished) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }

    /// Short error summary, `None` when nothing failed
    pub fn error_detail(&self) -> Option<String> {
        if self.failures.is_empty() {
            return if self.timed_out {
                Some("Timed out".to_string())
            } else {
                None
            };
        }
        Some(
            self.failures
                .iter()
                .map(|failure| failure.task.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stage position {position} is out of order in {execution}")]
pub struct StageOrderError {
    pub execution: String,
    pub position: u32,
}

/// An execution together with its ordered stages
#[derive(Debug, Clone, PartialEq)]
pub struct StageTrace {
    execution: WorkflowExecution,
    stages: Vec<Stage>,
}

impl StageTrace {
    /// Positions must be strictly increasing; they are never re-sorted here
    pub fn new(execution: WorkflowExecution, stages: Vec<Stage>) -> Result<Self, StageOrderError> {
        for pair in stages.windows(2) {
            if pair[1].position <= pair[0].position {
                return Err(StageOrderError {
                    execution: execution.identity.to_string(),
                    position: pair[1].position,
                });
            }
        }
        Ok(Self { execution, stages })
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkflowStatus;
    use crate::navigation::WorkflowIdentity;
    use chrono::TimeZone;

    fn execution() -> WorkflowExecution {
        WorkflowExecution {
            identity: WorkflowIdentity::new("h", "t").unwrap(),
            region: None,
            workflow_type: "upgrade_7_to_8".to_string(),
            release: None,
            started: None,
            finished: None,
            last_updated: None,
            status: WorkflowStatus::Running,
            failure_stage: None,
            failure_reason: None,
            automation_failure: false,
            failed_validation: false,
        }
    }

    fn stage(position: u32) -> Stage {
        Stage {
            position,
            name: format!("stage-{}", position),
            status: StageStatus::Succeeded,
            started: None,
            finished: None,
            timed_out: false,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_job_status_mapping() {
        assert_eq!(StageStatus::from_job_status("successful"), StageStatus::Succeeded);
        assert_eq!(StageStatus::from_job_status("failed"), StageStatus::Failed);
        assert_eq!(StageStatus::from_job_status("running"), StageStatus::Running);
        assert_eq!(StageStatus::from_job_status("canceled"), StageStatus::Canceled);
        assert_eq!(StageStatus::from_job_status("weird"), StageStatus::Unknown);
    }

    #[test]
    fn test_trace_keeps_given_order() {
        let trace = StageTrace::new(execution(), vec![stage(0), stage(2), stage(5)]).unwrap();
        let positions: Vec<u32> = trace.stages().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 2, 5]);
    }

    #[test]
    fn test_trace_rejects_duplicate_or_unordered_positions() {
        let err = StageTrace::new(execution(), vec![stage(0), stage(0)]).unwrap_err();
        assert_eq!(err.position, 0);
        assert!(StageTrace::new(execution(), vec![stage(3), stage(1)]).is_err());
    }

    #[test]
    fn test_error_detail() {
        let mut failed = stage(0);
        assert_eq!(failed.error_detail(), None);

        failed.timed_out = true;
        assert_eq!(failed.error_detail().as_deref(), Some("Timed out"));

        failed.failures = vec![
            TaskFailure {
                task: "Check for inhibitors".to_string(),
                message: None,
                automation_failure: false,
            },
            TaskFailure {
                task: "Run leapp upgrade".to_string(),
                message: Some("exit 1".to_string()),
                automation_failure: true,
            },
        ];
        assert_eq!(
            failed.error_detail().as_deref(),
            Some("Check for inhibitors; Run leapp upgrade")
        );
    }

    #[test]
    fn test_duration() {
        let mut s = stage(0);
        s.started = Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        s.finished = Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 30).unwrap());
        assert_eq!(s.duration(), Some(chrono::Duration::seconds(330)));
    }
}
