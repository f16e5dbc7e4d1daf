use crate::models::{AnalyticsInterval, AnalyticsReport};
use crate::navigation::{href, ViewSelector};

use super::html::{self, html_escape, with_query};
use super::{RenderedView, ViewContext};

pub async fn render(ctx: &ViewContext<'_>) -> RenderedView {
    let interval = ctx.params.interval;
    let load = ctx.load(ctx.state.data.analytics(interval)).await;
    ctx.data_view("Analytics", load, |report| {
        format!("{}\n{}", interval_switch(interval), render_report(report))
    })
}

fn interval_switch(current: AnalyticsInterval) -> String {
    let base = href(ViewSelector::Analytics);
    let links: Vec<String> = AnalyticsInterval::ALL
        .iter()
        .map(|interval| {
            let link = with_query(&base, &[("interval", interval.as_str().to_string())]);
            if *interval == current {
                format!(
                    r#"<a class="rounded bg-indigo-600 px-2 py-1 text-white" aria-pressed="true" href="{}">{}</a>"#,
                    html_escape(&link),
                    interval.as_str()
                )
            } else {
                format!(
                    r#"<a class="rounded px-2 py-1 text-indigo-600 hover:bg-gray-100" href="{}">{}</a>"#,
                    html_escape(&link),
                    interval.as_str()
                )
            }
        })
        .collect();

    format!(
        r#"<div class="flex gap-2 text-sm" role="group" aria-label="Interval">{}</div>"#,
        links.join("")
    )
}

/// Width of a bar as a percentage of the busiest period
fn bar_width(value: u64, peak: u64) -> u64 {
    if peak == 0 {
        0
    } else {
        value * 100 / peak
    }
}

fn render_report(report: &AnalyticsReport) -> String {
    if report.periods.is_empty() {
        return html::empty_panel("No workflow executions in range.");
    }

    let peak = report.peak_total();
    let format = match report.interval {
        AnalyticsInterval::Month => "%Y-%m",
        AnalyticsInterval::Day | AnalyticsInterval::Week => "%Y-%m-%d",
    };

    let periods: String = report
        .periods
        .iter()
        .map(|period| {
            format!(
                r#"<tr>
        <td class="px-3 py-2 whitespace-nowrap">{start}</td>
        <td class="px-3 py-2 w-1/2">
            <div class="flex h-3 overflow-hidden rounded bg-gray-100" style="width: {width}%">
                <div class="bg-green-500" style="flex: {succeeded}"></div>
                <div class="bg-red-500" style="flex: {failed}"></div>
                <div class="bg-blue-400" style="flex: {running}"></div>
            </div>
        </td>
        <td class="px-3 py-2 text-right">{total}</td>
        <td class="px-3 py-2 text-right text-green-700">{succeeded}</td>
        <td class="px-3 py-2 text-right text-red-700">{failed}</td>
        <td class="px-3 py-2 text-right text-blue-700">{running}</td>
    </tr>"#,
                start = period.period_start.format(format),
                width = bar_width(period.total, peak),
                succeeded = period.succeeded,
                failed = period.failed,
                running = period.running,
                total = period.total,
            )
        })
        .collect();

    let types: String = report
        .by_workflow_type
        .iter()
        .map(|breakdown| {
            let rate = if breakdown.total == 0 {
                0
            } else {
                breakdown.failed * 100 / breakdown.total
            };
            format!(
                r#"<tr>
        <td class="px-3 py-2">{}</td>
        <td class="px-3 py-2 text-right">{}</td>
        <td class="px-3 py-2 text-right">{}</td>
        <td class="px-3 py-2 text-right">{}%</td>
    </tr>"#,
                html_escape(&breakdown.workflow_type),
                breakdown.total,
                breakdown.failed,
                rate
            )
        })
        .collect();

    format!(
        r#"<div class="overflow-x-auto rounded-lg bg-white shadow">
<table class="min-w-full divide-y divide-gray-200 text-sm" data-table="periods">
    <thead><tr>
        <th class="px-3 py-2 text-left">Period</th>
        <th class="px-3 py-2"></th>
        <th class="px-3 py-2 text-right">Total</th>
        <th class="px-3 py-2 text-right">Succeeded</th>
        <th class="px-3 py-2 text-right">Failed</th>
        <th class="px-3 py-2 text-right">Running</th>
    </tr></thead>
    <tbody class="divide-y divide-gray-100">{periods}</tbody>
</table>
</div>
<div class="overflow-x-auto rounded-lg bg-white shadow">
<table class="min-w-full divide-y divide-gray-200 text-sm" data-table="workflow-types">
    <thead><tr>
        <th class="px-3 py-2 text-left">Workflow type</th>
        <th class="px-3 py-2 text-right">Executions</th>
        <th class="px-3 py-2 text-right">Failed</th>
        <th class="px-3 py-2 text-right">Failure rate</th>
    </tr></thead>
    <tbody class="divide-y divide-gray-100">{types}</tbody>
</table>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyticsAggregate, WorkflowTypeBreakdown};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(5, 10), 50);
        assert_eq!(bar_width(10, 10), 100);
        assert_eq!(bar_width(0, 0), 0);
    }

    #[test]
    fn test_interval_switch_marks_current() {
        let html = interval_switch(AnalyticsInterval::Month);
        assert!(html.contains(r#"aria-pressed="true" href="/analytics?interval=month""#));
        assert!(html.contains(r#"href="/analytics?interval=day""#));
    }

    #[test]
    fn test_report_tables() {
        let report = AnalyticsReport {
            interval: AnalyticsInterval::Week,
            periods: vec![AnalyticsAggregate {
                period_start: Utc.with_ymd_and_hms(2024, 2, 26, 0, 0, 0).unwrap(),
                total: 10,
                succeeded: 6,
                failed: 3,
                running: 1,
            }],
            by_workflow_type: vec![WorkflowTypeBreakdown {
                workflow_type: "upgrade_7_to_8".to_string(),
                total: 8,
                failed: 2,
            }],
        };
        let html = render_report(&report);
        assert!(html.contains("2024-02-26"));
        assert!(html.contains("width: 100%"));
        assert!(html.contains("25%"));
    }
}
