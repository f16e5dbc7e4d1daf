use crate::models::Host;
use crate::navigation::{href, stage_trace_href, ViewSelector};

use super::html::{self, fmt_time, html_escape, readiness_badge, with_query};
use super::{RenderedView, ViewContext};

pub async fn render(ctx: &ViewContext<'_>) -> RenderedView {
    let load = ctx.load(ctx.state.data.list_hosts()).await;
    ctx.data_view("Hosts", load, |hosts| render_hosts(hosts))
}

fn host_row(host: &Host) -> String {
    let workflows = with_query(
        &href(ViewSelector::WorkflowList),
        &[("hostname", host.hostname.clone())],
    );
    let latest = host
        .latest
        .as_ref()
        .map(|identity| {
            format!(
                r#"<a class="text-indigo-600 hover:underline" href="{}">Latest</a>"#,
                html_escape(&stage_trace_href(identity))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<tr>
        <td class="px-3 py-2"><a class="text-indigo-600 hover:underline" href="{workflows}">{hostname}</a></td>
        <td class="px-3 py-2">{region}</td>
        <td class="px-3 py-2">{os}</td>
        <td class="px-3 py-2">{readiness}</td>
        <td class="px-3 py-2">{last_seen}</td>
        <td class="px-3 py-2 text-right">{count}</td>
        <td class="px-3 py-2">{latest}</td>
    </tr>"#,
        workflows = html_escape(&workflows),
        hostname = html_escape(&host.hostname),
        region = html_escape(host.region.as_deref().unwrap_or("-")),
        os = host
            .os_major
            .map(|major| format!("RHEL {}", major))
            .unwrap_or_else(|| "-".to_string()),
        readiness = readiness_badge(host.readiness),
        last_seen = fmt_time(host.last_seen),
        count = host.workflow_count,
    )
}

fn render_hosts(hosts: &[Host]) -> String {
    if hosts.is_empty() {
        return html::empty_panel("No hosts have reported a workflow yet.");
    }

    let rows: String = hosts.iter().map(host_row).collect();
    format!(
        r#"<p class="text-sm text-gray-600">{count} hosts</p>
<div class="overflow-x-auto rounded-lg bg-white shadow">
<table class="min-w-full divide-y divide-gray-200 text-sm">
    <thead><tr>
        <th class="px-3 py-2 text-left">Hostname</th>
        <th class="px-3 py-2 text-left">Region</th>
        <th class="px-3 py-2 text-left">OS</th>
        <th class="px-3 py-2 text-left">Readiness</th>
        <th class="px-3 py-2 text-left">Last seen</th>
        <th class="px-3 py-2 text-right">Executions</th>
        <th class="px-3 py-2"></th>
    </tr></thead>
    <tbody class="divide-y divide-gray-100">{rows}</tbody>
</table>
</div>"#,
        count = hosts.len(),
    )
}
