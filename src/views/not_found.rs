use crate::navigation::{href, ViewSelector};

use super::html::{heading, html_escape};
use super::RenderedView;

pub fn render(path: &str) -> RenderedView {
    let body = format!(
        r#"{}
<div class="rounded-lg bg-white p-6 shadow" data-panel="not-found">
    <p class="text-gray-700">Nothing lives at <code>{}</code>.</p>
    <a class="mt-4 inline-block text-sm text-indigo-600 hover:underline" href="{}">Back to the dashboard</a>
</div>"#,
        heading("Page not found"),
        html_escape(path),
        href(ViewSelector::Dashboard),
    );
    RenderedView::new("Page not found", body)
}
