use crate::models::{Stage, StageTrace, WorkflowExecution};
use crate::navigation::{href, ViewSelector, WorkflowIdentity};

use super::html::{self, fmt_duration, fmt_time, html_escape, stage_badge, with_query, workflow_badge};
use super::{RenderedView, ViewContext};

const TITLE: &str = "Stage trace";

/// Exactly one data query per activation, keyed by the route's identity
pub async fn render(ctx: &ViewContext<'_>, identity: &WorkflowIdentity) -> RenderedView {
    let load = ctx.load(ctx.state.data.stage_trace(identity)).await;
    ctx.data_view(TITLE, load, |trace| match trace {
        Some(trace) => render_trace(trace),
        None => html::empty_panel(&format!("No execution found for {}.", identity)),
    })
}

fn render_header(execution: &WorkflowExecution) -> String {
    let hostname = execution.identity.hostname();
    let host_workflows = with_query(
        &href(ViewSelector::WorkflowList),
        &[("hostname", hostname.to_string())],
    );

    let failure = match (&execution.failure_stage, &execution.failure_reason) {
        (Some(stage), reason) => format!(
            r#"<div class="col-span-2"><dt class="text-gray-500">Failure</dt><dd class="text-red-700">{}{}</dd></div>"#,
            html_escape(stage),
            reason
                .as_deref()
                .map(|r| format!(": {}", html_escape(r)))
                .unwrap_or_default()
        ),
        (None, _) => String::new(),
    };

    format!(
        r#"<div class="rounded-lg bg-white p-4 shadow" data-identity="{identity}">
    <dl class="grid grid-cols-2 gap-3 text-sm md:grid-cols-4">
        <div><dt class="text-gray-500">Host</dt><dd><a class="text-indigo-600 hover:underline" href="{host_workflows}">{host}</a></dd></div>
        <div><dt class="text-gray-500">Transaction</dt><dd class="font-mono text-xs">{tx}</dd></div>
        <div><dt class="text-gray-500">Workflow</dt><dd>{workflow_type}</dd></div>
        <div><dt class="text-gray-500">Status</dt><dd>{badge}</dd></div>
        <div><dt class="text-gray-500">Region</dt><dd>{region}</dd></div>
        <div><dt class="text-gray-500">Release</dt><dd>{release}</dd></div>
        <div><dt class="text-gray-500">Started</dt><dd>{started}</dd></div>
        <div><dt class="text-gray-500">Finished</dt><dd>{finished}</dd></div>
        {failure}
    </dl>
</div>"#,
        identity = html_escape(&execution.identity.to_string()),
        host_workflows = html_escape(&host_workflows),
        host = html_escape(hostname),
        tx = html_escape(execution.identity.transaction_id()),
        workflow_type = html_escape(&execution.workflow_type),
        badge = workflow_badge(execution.status),
        region = html_escape(execution.region.as_deref().unwrap_or("-")),
        release = html_escape(execution.release.as_deref().unwrap_or("-")),
        started = fmt_time(execution.started),
        finished = fmt_time(execution.finished),
    )
}

fn stage_row(stage: &Stage) -> String {
    let failures: String = stage
        .failures
        .iter()
        .map(|failure| {
            let kind = if failure.automation_failure {
                ""
            } else {
                r#" <span class="text-xs text-gray-500">(expected check)</span>"#
            };
            format!(
                r#"<li><span class="font-medium">{}</span>{}{}</li>"#,
                html_escape(&failure.task),
                kind,
                failure
                    .message
                    .as_deref()
                    .map(|m| format!(
                        r#"<pre class="mt-1 whitespace-pre-wrap text-xs text-gray-600">{}</pre>"#,
                        html_escape(m)
                    ))
                    .unwrap_or_default()
            )
        })
        .collect();

    let detail = match stage.error_detail() {
        Some(_) if !failures.is_empty() => format!(r#"<ul class="space-y-1">{}</ul>"#, failures),
        Some(detail) => html_escape(&detail),
        None => String::new(),
    };

    format!(
        r#"<tr data-position="{position}">
        <td class="px-3 py-2 text-gray-500">{step}</td>
        <td class="px-3 py-2">{name}</td>
        <td class="px-3 py-2">{badge}</td>
        <td class="px-3 py-2">{started}</td>
        <td class="px-3 py-2">{finished}</td>
        <td class="px-3 py-2">{duration}</td>
        <td class="px-3 py-2">{timed_out}</td>
        <td class="px-3 py-2 text-red-700">{detail}</td>
    </tr>"#,
        position = stage.position,
        step = stage.position + 1,
        name = html_escape(&stage.name),
        badge = stage_badge(stage.status),
        started = fmt_time(stage.started),
        finished = fmt_time(stage.finished),
        duration = fmt_duration(stage.duration()),
        timed_out = if stage.timed_out { "yes" } else { "no" },
    )
}

fn render_trace(trace: &StageTrace) -> String {
    let header = render_header(trace.execution());

    if trace.stages().is_empty() {
        return format!(
            "{}\n{}",
            header,
            html::empty_panel("This execution has no recorded stages.")
        );
    }

    let rows: String = trace.stages().iter().map(stage_row).collect();
    format!(
        r#"{header}
<div class="overflow-x-auto rounded-lg bg-white shadow">
<table class="min-w-full divide-y divide-gray-200 text-sm">
    <thead><tr>
        <th class="px-3 py-2 text-left">#</th>
        <th class="px-3 py-2 text-left">Stage</th>
        <th class="px-3 py-2 text-left">Status</th>
        <th class="px-3 py-2 text-left">Started</th>
        <th class="px-3 py-2 text-left">Finished</th>
        <th class="px-3 py-2 text-left">Duration</th>
        <th class="px-3 py-2 text-left">Timed out</th>
        <th class="px-3 py-2 text-left">Errors</th>
    </tr></thead>
    <tbody class="divide-y divide-gray-100">{rows}</tbody>
</table>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StageStatus, TaskFailure, WorkflowStatus};

    fn execution() -> WorkflowExecution {
        WorkflowExecution {
            identity: WorkflowIdentity::new("host01.example.com", "3f9a-tx").unwrap(),
            region: Some("amrs".to_string()),
            workflow_type: "upgrade_7_to_8".to_string(),
            release: Some("8.10".to_string()),
            started: None,
            finished: None,
            last_updated: None,
            status: WorkflowStatus::Failed,
            failure_stage: Some("upgrade".to_string()),
            failure_reason: Some("Run leapp upgrade".to_string()),
            automation_failure: true,
            failed_validation: false,
        }
    }

    fn stage(position: u32, name: &str, status: StageStatus) -> Stage {
        Stage {
            position,
            name: name.to_string(),
            status,
            started: None,
            finished: None,
            timed_out: false,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_stages_render_in_given_order() {
        let mut failed = stage(1, "upgrade", StageStatus::Failed);
        failed.failures.push(TaskFailure {
            task: "Run leapp upgrade".to_string(),
            message: Some("exit <1>".to_string()),
            automation_failure: true,
        });
        let trace = StageTrace::new(
            execution(),
            vec![
                stage(0, "preupgrade", StageStatus::Succeeded),
                failed,
                stage(2, "revert", StageStatus::Succeeded),
            ],
        )
        .unwrap();

        let html = render_trace(&trace);
        let first = html.find(r#"data-position="0""#).unwrap();
        let second = html.find(r#"data-position="1""#).unwrap();
        let third = html.find(r#"data-position="2""#).unwrap();
        assert!(first < second && second < third);
        assert!(html.contains("exit &lt;1&gt;"));
        assert!(html.contains(r#"href="/workflows?hostname=host01.example.com""#));
    }

    #[test]
    fn test_trace_without_stages() {
        let trace = StageTrace::new(execution(), Vec::new()).unwrap();
        assert!(render_trace(&trace).contains("no recorded stages"));
    }
}
