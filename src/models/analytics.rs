use chrono::{DateTime, Utc};

/// Bucket width of the analytics histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsInterval {
    Day,
    #[default]
    Week,
    Month,
}

impl AnalyticsInterval {
    pub const ALL: [AnalyticsInterval; 3] = [
        AnalyticsInterval::Day,
        AnalyticsInterval::Week,
        AnalyticsInterval::Month,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(AnalyticsInterval::Day),
            "week" => Some(AnalyticsInterval::Week),
            "month" => Some(AnalyticsInterval::Month),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsInterval::Day => "day",
            AnalyticsInterval::Week => "week",
            AnalyticsInterval::Month => "month",
        }
    }
}

/// Success/failure counts for one period, as computed by the data service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsAggregate {
    pub period_start: DateTime<Utc>,
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub running: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTypeBreakdown {
    pub workflow_type: String,
    pub total: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub interval: AnalyticsInterval,
    pub periods: Vec<AnalyticsAggregate>,
    pub by_workflow_type: Vec<WorkflowTypeBreakdown>,
}

impl AnalyticsReport {
    /// Largest period total, used to scale bars
    pub fn peak_total(&self) -> u64 {
        self.periods.iter().map(|p| p.total).max().unwrap_or(0)
    }
}
