use crate::models::{FleetSummary, WorkflowExecution};
use crate::navigation::{href, stage_trace_href, ViewSelector};

use super::html::{fmt_time, html_escape, workflow_badge};
use super::{RenderedView, ViewContext};

pub async fn render(ctx: &ViewContext<'_>) -> RenderedView {
    let load = ctx.load(ctx.state.data.fleet_summary()).await;
    ctx.data_view("Dashboard", load, render_summary)
}

fn stat_card(label: &str, value: u64, accent: &str) -> String {
    format!(
        r#"<div class="rounded-lg bg-white p-4 shadow" data-stat="{label}">
    <dt class="text-sm text-gray-500">{label}</dt>
    <dd class="mt-1 text-2xl font-semibold text-{accent}-700">{value}</dd>
</div>"#
    )
}

fn render_summary(summary: &FleetSummary) -> String {
    let cards = [
        stat_card("Workflows", summary.total_workflows, "gray"),
        stat_card("Succeeded", summary.succeeded, "green"),
        stat_card("Failed", summary.failed, "red"),
        stat_card("Running", summary.running, "blue"),
        stat_card("Automation failures", summary.automation_failures, "orange"),
        stat_card("Hosts", summary.host_count, "gray"),
    ]
    .join("\n");

    let failures = if summary.recent_failures.is_empty() {
        r#"<p class="text-sm text-gray-500">No failed workflows.</p>"#.to_string()
    } else {
        let rows: String = summary.recent_failures.iter().map(failure_row).collect();
        format!(
            r#"<table class="min-w-full divide-y divide-gray-200 text-sm">
    <thead><tr>
        <th class="px-3 py-2 text-left">Host</th>
        <th class="px-3 py-2 text-left">Workflow</th>
        <th class="px-3 py-2 text-left">Failed stage</th>
        <th class="px-3 py-2 text-left">Reason</th>
        <th class="px-3 py-2 text-left">Started</th>
        <th class="px-3 py-2 text-left">Status</th>
        <th class="px-3 py-2"></th>
    </tr></thead>
    <tbody class="divide-y divide-gray-100">{rows}</tbody>
</table>"#
        )
    };

    format!(
        r#"<dl class="grid grid-cols-2 gap-4 md:grid-cols-3">
{cards}
</dl>
<div class="rounded-lg bg-white p-4 shadow">
    <div class="flex items-center justify-between">
        <h2 class="text-lg font-medium text-gray-900">Recent failures</h2>
        <a class="text-sm text-indigo-600 hover:underline" href="{workflows}">All workflows</a>
    </div>
    {failures}
</div>"#,
        workflows = href(ViewSelector::WorkflowList),
    )
}

fn failure_row(execution: &WorkflowExecution) -> String {
    format!(
        r#"<tr>
        <td class="px-3 py-2">{host}</td>
        <td class="px-3 py-2">{workflow_type}</td>
        <td class="px-3 py-2">{stage}</td>
        <td class="px-3 py-2">{reason}</td>
        <td class="px-3 py-2">{started}</td>
        <td class="px-3 py-2">{badge}</td>
        <td class="px-3 py-2"><a class="text-indigo-600 hover:underline" href="{link}">Stages</a></td>
    </tr>"#,
        host = html_escape(execution.identity.hostname()),
        workflow_type = html_escape(&execution.workflow_type),
        stage = html_escape(execution.failure_stage.as_deref().unwrap_or("-")),
        reason = html_escape(execution.failure_reason.as_deref().unwrap_or("-")),
        started = fmt_time(execution.started),
        badge = workflow_badge(execution.status),
        link = html_escape(&stage_trace_href(&execution.identity)),
    )
}
