use crate::navigation::{href, ViewSelector};

use super::html::{heading, html_escape};
use super::RenderedView;

/// Stand-in for pages that exist in the menu but have no content yet
pub fn render(label: &str) -> RenderedView {
    let body = format!(
        r#"{}
<div class="rounded-lg bg-white p-6 shadow" data-panel="placeholder">
    <p class="text-gray-700">The {} page is being built.</p>
    <a class="mt-4 inline-block text-sm text-indigo-600 hover:underline" href="{}">Back to the dashboard</a>
</div>"#,
        heading(label),
        html_escape(label),
        href(ViewSelector::Dashboard),
    );
    RenderedView::new(label, body)
}
