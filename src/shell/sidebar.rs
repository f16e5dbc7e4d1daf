use crate::navigation::{href, ViewSelector};
use crate::views::html::html_escape;

/// Sidebar entries, in display order
pub const ITEMS: [(&str, ViewSelector); 4] = [
    ("Home", ViewSelector::Dashboard),
    ("Workflows", ViewSelector::WorkflowList),
    ("Hosts", ViewSelector::HostList),
    ("Analytics", ViewSelector::Analytics),
];

/// Highlight is an exact path match; drill-down pages highlight nothing
pub fn render(current_path: &str) -> String {
    let links: String = ITEMS
        .iter()
        .map(|(label, view)| {
            let target = href(*view);
            if target == current_path {
                format!(
                    r#"
        <a class="block rounded px-3 py-2 bg-gray-200 font-semibold text-gray-900" aria-current="page" href="{}">{}</a>"#,
                    html_escape(&target),
                    label
                )
            } else {
                format!(
                    r#"
        <a class="block rounded px-3 py-2 text-gray-700 hover:bg-gray-100" href="{}">{}</a>"#,
                    html_escape(&target),
                    label
                )
            }
        })
        .collect();

    format!(
        r#"<aside class="w-56 shrink-0 border-r border-gray-200 bg-white">
    <div class="px-4 py-5 text-lg font-bold text-gray-900">LEAPP Reporting</div>
    <nav class="space-y-1 px-2" aria-label="Sidebar">{links}
    </nav>
</aside>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_highlight() {
        let html = render("/hosts");
        assert_eq!(html.matches(r#"aria-current="page""#).count(), 1);
        assert!(html.contains(r#"aria-current="page" href="/hosts""#));
    }

    #[test]
    fn test_home_highlight_only_on_root() {
        assert!(render("/").contains(r#"aria-current="page" href="/""#));
        assert!(!render("/workflows/db01/tx/stages").contains("aria-current"));
    }
}
