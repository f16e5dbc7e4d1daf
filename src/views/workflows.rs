use crate::models::{WorkflowExecution, WorkflowFilter, WorkflowPage};
use crate::navigation::{href, stage_trace_href, ViewSelector};

use super::html::{self, fmt_time, html_escape, with_query, workflow_badge};
use super::{FilterForm, RenderedView, ViewContext};

const TITLE: &str = "Workflows";

pub async fn render(ctx: &ViewContext<'_>) -> RenderedView {
    let form = filter_form(&ctx.params.form);

    let filter = match &ctx.params.filter {
        Ok(filter) => filter,
        Err(message) => {
            // Rejected filters never reach the data service
            let body = format!("{}\n{}", form, validation_panel(message));
            return RenderedView::new(
                TITLE,
                format!(
                    "{}\n{}",
                    html::heading(TITLE),
                    html::data_panel(&ctx.banner(None), &body)
                ),
            );
        }
    };

    let load = ctx.load(ctx.state.data.list_workflows(filter)).await;
    ctx.data_view(TITLE, load, |page| {
        format!("{}\n{}", form, render_page(filter, page))
    })
}

fn validation_panel(message: &str) -> String {
    format!(
        r#"<div class="rounded-md bg-yellow-50 p-4" role="alert" data-panel="validation">
    <p class="text-sm text-yellow-800">{}</p>
</div>"#,
        html_escape(message)
    )
}

fn text_input(name: &str, label: &str, value: &str, kind: &str) -> String {
    format!(
        r#"<label class="block text-xs text-gray-600">{label}
        <input class="mt-1 block w-full rounded border-gray-300 text-sm" type="{kind}" name="{name}" value="{value}">
    </label>"#,
        value = html_escape(value),
    )
}

fn filter_form(form: &FilterForm) -> String {
    let fields = [
        text_input("hostname", "Hostname", &form.hostname, "text"),
        text_input("region", "Region", &form.region, "text"),
        text_input("workflow_type", "Workflow type", &form.workflow_type, "text"),
        text_input("failure_stage", "Failed stage", &form.failure_stage, "text"),
        text_input("error", "Error text", &form.error, "text"),
        text_input("from", "Started from", &form.from, "date"),
        text_input("to", "Started to", &form.to, "date"),
    ]
    .join("\n    ");

    format!(
        r#"<form class="grid grid-cols-2 gap-3 rounded-lg bg-white p-4 shadow md:grid-cols-4" method="get" action="{action}">
    {fields}
    <div class="flex items-end gap-2">
        <button class="rounded bg-indigo-600 px-3 py-1 text-sm text-white" type="submit">Filter</button>
        <a class="text-sm text-gray-600 hover:underline" href="{action}">Clear</a>
    </div>
</form>"#,
        action = href(ViewSelector::WorkflowList),
    )
}

fn page_href(filter: &WorkflowFilter, page: u32) -> String {
    let mut pairs = filter.query_pairs();
    if page > 1 {
        pairs.push(("page", page.to_string()));
    }
    with_query(&href(ViewSelector::WorkflowList), &pairs)
}

fn render_page(filter: &WorkflowFilter, page: &WorkflowPage) -> String {
    if page.executions.is_empty() {
        if page.total > 0 {
            return format!(
                r#"{}
<a class="text-sm text-indigo-600 hover:underline" href="{}">Back to page 1</a>"#,
                html::empty_panel(&format!(
                    "Page {} is past the last page ({}).",
                    page.page,
                    page.page_count()
                )),
                html_escape(&page_href(filter, 1))
            );
        }
        let message = if filter.is_empty() {
            "No workflow executions recorded yet."
        } else {
            "No workflow executions match these filters."
        };
        return html::empty_panel(message);
    }

    let rows: String = page.executions.iter().map(execution_row).collect();

    let mut pager = Vec::new();
    if page.has_previous() {
        pager.push(format!(
            r#"<a class="text-indigo-600 hover:underline" rel="prev" href="{}">Previous</a>"#,
            html_escape(&page_href(filter, page.page - 1))
        ));
    }
    pager.push(format!(
        r#"<span class="text-gray-600">Page {} of {} ({} executions)</span>"#,
        page.page,
        page.page_count(),
        page.total
    ));
    if page.has_next() {
        pager.push(format!(
            r#"<a class="text-indigo-600 hover:underline" rel="next" href="{}">Next</a>"#,
            html_escape(&page_href(filter, page.page + 1))
        ));
    }

    format!(
        r#"<div class="overflow-x-auto rounded-lg bg-white shadow">
<table class="min-w-full divide-y divide-gray-200 text-sm">
    <thead><tr>
        <th class="px-3 py-2 text-left">Host</th>
        <th class="px-3 py-2 text-left">Transaction</th>
        <th class="px-3 py-2 text-left">Type</th>
        <th class="px-3 py-2 text-left">Region</th>
        <th class="px-3 py-2 text-left">Status</th>
        <th class="px-3 py-2 text-left">Failed stage</th>
        <th class="px-3 py-2 text-left">Started</th>
        <th class="px-3 py-2 text-left">Finished</th>
        <th class="px-3 py-2"></th>
    </tr></thead>
    <tbody class="divide-y divide-gray-100">{rows}</tbody>
</table>
</div>
<nav class="flex items-center gap-4 text-sm" aria-label="Pagination">{pager}</nav>"#,
        pager = pager.join("\n"),
    )
}

fn execution_row(execution: &WorkflowExecution) -> String {
    format!(
        r#"<tr>
        <td class="px-3 py-2">{host}</td>
        <td class="px-3 py-2 font-mono text-xs">{tx}</td>
        <td class="px-3 py-2">{workflow_type}</td>
        <td class="px-3 py-2">{region}</td>
        <td class="px-3 py-2">{badge}</td>
        <td class="px-3 py-2">{stage}</td>
        <td class="px-3 py-2">{started}</td>
        <td class="px-3 py-2">{finished}</td>
        <td class="px-3 py-2"><a class="text-indigo-600 hover:underline" href="{link}">Stages</a></td>
    </tr>"#,
        host = html_escape(execution.identity.hostname()),
        tx = html_escape(execution.identity.transaction_id()),
        workflow_type = html_escape(&execution.workflow_type),
        region = html_escape(execution.region.as_deref().unwrap_or("-")),
        badge = workflow_badge(execution.status),
        stage = html_escape(execution.failure_stage.as_deref().unwrap_or("-")),
        started = fmt_time(execution.started),
        finished = fmt_time(execution.finished),
        link = html_escape(&stage_trace_href(&execution.identity)),
    )
}
