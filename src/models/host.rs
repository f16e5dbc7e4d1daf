use chrono::{DateTime, Utc};

use super::workflow::{WorkflowExecution, WorkflowKind, WorkflowStatus};
use crate::navigation::WorkflowIdentity;

/// Where a host stands with respect to its OS upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostReadiness {
    Upgraded,
    Ready,
    Blocked,
    InProgress,
    Unknown,
}

impl HostReadiness {
    /// Derive readiness from the most recent execution on the host
    pub fn from_latest(latest: &WorkflowExecution) -> Self {
        match latest.status {
            WorkflowStatus::Running => HostReadiness::InProgress,
            WorkflowStatus::Failed => HostReadiness::Blocked,
            WorkflowStatus::Succeeded => match WorkflowKind::parse(&latest.workflow_type) {
                Some(kind) if kind.is_upgrade() => HostReadiness::Upgraded,
                Some(_) => HostReadiness::Ready,
                None => HostReadiness::Unknown,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostReadiness::Upgraded => "upgraded",
            HostReadiness::Ready => "ready",
            HostReadiness::Blocked => "blocked",
            HostReadiness::InProgress => "in progress",
            HostReadiness::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    pub hostname: String,
    pub region: Option<String>,
    /// Current RHEL major, inferred from the latest workflow type
    pub os_major: Option<u8>,
    pub last_seen: Option<DateTime<Utc>>,
    pub readiness: HostReadiness,
    pub workflow_count: u64,
    pub latest: Option<WorkflowIdentity>,
}

impl Host {
    pub fn from_latest(latest: &WorkflowExecution, workflow_count: u64) -> Self {
        let readiness = HostReadiness::from_latest(latest);
        let os_major = WorkflowKind::parse(&latest.workflow_type).map(|kind| {
            if readiness == HostReadiness::Upgraded {
                kind.to_major
            } else {
                kind.from_major
            }
        });

        Self {
            hostname: latest.identity.hostname().to_string(),
            region: latest.region.clone(),
            os_major,
            last_seen: latest
                .last_updated
                .or(latest.finished)
                .or(latest.started),
            readiness,
            workflow_count,
            latest: Some(latest.identity.clone()),
        }
    }
}
