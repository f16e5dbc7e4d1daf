//! Small HTML helpers shared by the views and the shell.

use chrono::{DateTime, Utc};

use crate::models::{HostReadiness, StageStatus, WorkflowStatus};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// `path?key=value&...` with each value percent-encoded
pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", path, query)
}

pub fn fmt_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn fmt_duration(duration: Option<chrono::Duration>) -> String {
    let Some(duration) = duration else {
        return "-".to_string();
    };
    let secs = duration.num_seconds();
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

fn badge(text: &str, colour: &str) -> String {
    format!(
        r#"<span class="inline-flex rounded-full px-2 text-xs font-semibold bg-{colour}-100 text-{colour}-800">{}</span>"#,
        html_escape(text),
    )
}

pub fn workflow_badge(status: WorkflowStatus) -> String {
    let colour = match status {
        WorkflowStatus::Succeeded => "green",
        WorkflowStatus::Failed => "red",
        WorkflowStatus::Running => "blue",
    };
    badge(status.as_str(), colour)
}

pub fn stage_badge(status: StageStatus) -> String {
    let colour = match status {
        StageStatus::Succeeded => "green",
        StageStatus::Failed => "red",
        StageStatus::Running => "blue",
        StageStatus::Canceled => "yellow",
        StageStatus::Unknown => "gray",
    };
    badge(status.as_str(), colour)
}

pub fn readiness_badge(readiness: HostReadiness) -> String {
    let colour = match readiness {
        HostReadiness::Upgraded => "green",
        HostReadiness::Ready => "teal",
        HostReadiness::Blocked => "red",
        HostReadiness::InProgress => "blue",
        HostReadiness::Unknown => "gray",
    };
    badge(readiness.as_str(), colour)
}

/// Content of a data view: the staleness banner, then the view body
pub fn data_panel(banner: &str, body: &str) -> String {
    format!(
        r#"<section class="space-y-4" data-panel="data">
    {banner}
    {body}
</section>"#
    )
}

/// Recoverable failure, local to the content region
pub fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="rounded-md bg-red-50 p-4" role="alert" data-panel="error">
    <h3 class="text-sm font-medium text-red-800">Could not load data</h3>
    <p class="mt-2 text-sm text-red-700">{}</p>
    <p class="mt-2 text-sm text-red-700">Reload the page to try again.</p>
</div>"#,
        html_escape(message)
    )
}

/// Shown when the route changed before the view's data arrived
pub fn superseded_panel() -> String {
    r#"<div class="rounded-md bg-gray-50 p-4" data-panel="superseded">
    <p class="text-sm text-gray-600">Navigation changed before this view finished loading.</p>
</div>"#
        .to_string()
}

pub fn empty_panel(message: &str) -> String {
    format!(
        r#"<div class="rounded-md bg-gray-50 p-4" data-panel="empty">
    <p class="text-sm text-gray-600">{}</p>
</div>"#,
        html_escape(message)
    )
}

pub fn heading(title: &str) -> String {
    format!(
        r#"<h1 class="text-2xl font-semibold text-gray-900">{}</h1>"#,
        html_escape(title)
    )
}
