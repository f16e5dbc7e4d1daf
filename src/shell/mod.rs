//! Page frame around every view: sidebar, menu and content region. The shell
//! only lays out what it is given; it never fetches data.

pub mod menu;
pub mod sidebar;

use crate::navigation::Resolution;
use crate::staleness::StalenessIndicator;
use crate::views::html::html_escape;
use crate::views::RenderedView;

pub fn render_page(
    resolution: &Resolution,
    view: &RenderedView,
    staleness: &StalenessIndicator,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - LEAPP Reporting</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen bg-gray-50">
<div class="flex min-h-screen">
{sidebar}
<div class="flex-1">
{menu}
<main id="content" class="space-y-4 p-6" data-view="{view}">
{body}
</main>
</div>
</div>
</body>
</html>"#,
        title = html_escape(&view.title),
        sidebar = sidebar::render(&resolution.path),
        menu = menu::render(staleness),
        view = resolution.view.name(),
        body = view.body,
    )
}
