use crate::navigation::{href, ViewSelector};
use crate::staleness::StalenessIndicator;
use crate::views::html::html_escape;

struct MenuItem {
    label: &'static str,
    view: ViewSelector,
    description: String,
}

struct MenuGroup {
    label: &'static str,
    items: Vec<MenuItem>,
}

fn groups(staleness: &StalenessIndicator) -> Vec<MenuGroup> {
    let disclosure = staleness.disclosure();
    vec![
        MenuGroup {
            label: "Data",
            items: vec![
                MenuItem {
                    label: "Workflows",
                    view: ViewSelector::WorkflowList,
                    description: format!(
                        "Every upgrade workflow execution, filterable by host, region and failure. {}.",
                        disclosure
                    ),
                },
                MenuItem {
                    label: "Hosts",
                    view: ViewSelector::HostList,
                    description: format!(
                        "Upgrade readiness and latest execution per host. {}.",
                        disclosure
                    ),
                },
                MenuItem {
                    label: "Analytics",
                    view: ViewSelector::Analytics,
                    description: format!("Success and failure trends over time. {}.", disclosure),
                },
            ],
        },
        MenuGroup {
            label: "Docs",
            items: ["Known Issues", "Release Info", "End User Agreement"]
                .into_iter()
                .map(|label| MenuItem {
                    label,
                    view: ViewSelector::Placeholder(label),
                    description: String::new(),
                })
                .collect(),
        },
    ]
}

fn render_item(item: &MenuItem) -> String {
    let description = if item.description.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="text-xs text-gray-500">{}</p>"#,
            html_escape(&item.description)
        )
    };
    format!(
        r#"
            <li class="px-3 py-2"><a class="text-sm font-medium text-gray-900 hover:underline" href="{}">{}</a>{}</li>"#,
        html_escape(&href(item.view)),
        item.label,
        description
    )
}

/// Two-level menu above the content region
pub fn render(staleness: &StalenessIndicator) -> String {
    let groups: String = groups(staleness)
        .iter()
        .map(|group| {
            let items: String = group.items.iter().map(render_item).collect();
            format!(
                r#"
    <details class="relative">
        <summary class="cursor-pointer px-3 py-2 text-sm font-semibold text-gray-700">{}</summary>
        <ul class="absolute z-10 mt-1 w-80 rounded-md bg-white shadow-lg">{}
        </ul>
    </details>"#,
                group.label, items
            )
        })
        .collect();

    format!(
        r#"<nav class="flex gap-2 border-b border-gray-200 bg-white px-4" aria-label="Main menu">{groups}
</nav>"#
    )
}
