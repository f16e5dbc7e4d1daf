//! Content-region views. Each view renders an HTML fragment; the shell wraps
//! it into a full page.

pub mod analytics;
pub mod dashboard;
pub mod hosts;
pub mod html;
pub mod loader;
pub mod not_found;
pub mod placeholder;
pub mod stages;
pub mod workflows;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::models::{AnalyticsInterval, WorkflowFilter};
use crate::navigation::{RouteStore, VersionedRoute, ViewSelector};
use crate::services::{DataFetchError, Snapshot};
use crate::state::AppState;

pub use loader::{load_view, ViewLoad};

/// A rendered content region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub title: String,
    pub body: String,
}

impl RenderedView {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Raw filter values, echoed back into the filter form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub hostname: String,
    pub region: String,
    pub workflow_type: String,
    pub failure_stage: String,
    pub error: String,
    pub from: String,
    pub to: String,
}

/// Query-string input of the page request, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    pub form: FilterForm,
    /// The workflow filter, or why it was rejected
    pub filter: Result<WorkflowFilter, String>,
    pub interval: AnalyticsInterval,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            form: FilterForm::default(),
            filter: Ok(WorkflowFilter::default()),
            interval: AnalyticsInterval::default(),
        }
    }
}

/// Everything a view needs to render one route
pub struct ViewContext<'a> {
    pub state: &'a AppState,
    pub store: &'a RouteStore,
    pub route: &'a VersionedRoute,
    pub params: &'a ViewParams,
}

impl ViewContext<'_> {
    /// Fetch data on behalf of the current route
    pub async fn load<T, F>(&self, fetch: F) -> ViewLoad<T>
    where
        F: Future<Output = Result<T, DataFetchError>>,
    {
        load_view(self.store, self.route, self.state.fetch_timeout, fetch).await
    }

    pub fn banner(&self, taken_at: Option<DateTime<Utc>>) -> String {
        self.state.staleness.render_banner(taken_at)
    }

    /// Wrap a load outcome into a data view; the staleness banner is present
    /// whatever the outcome
    fn data_view<T>(
        &self,
        title: &str,
        load: ViewLoad<Snapshot<T>>,
        render: impl FnOnce(&T) -> String,
    ) -> RenderedView {
        let (taken_at, content) = match load {
            ViewLoad::Ready(snapshot) => (snapshot.taken_at, render(&snapshot.data)),
            ViewLoad::Failed(e) => (None, html::error_panel(&e.to_string())),
            ViewLoad::Superseded => (None, html::superseded_panel()),
        };

        RenderedView::new(
            title,
            format!(
                "{}\n{}",
                html::heading(title),
                html::data_panel(&self.banner(taken_at), &content)
            ),
        )
    }
}

/// Render the content region for the context's route
pub async fn render(ctx: &ViewContext<'_>) -> RenderedView {
    let resolution = &ctx.route.resolution;
    match resolution.view {
        ViewSelector::Dashboard => dashboard::render(ctx).await,
        ViewSelector::WorkflowList => workflows::render(ctx).await,
        ViewSelector::StageTrace => match &resolution.identity {
            Some(identity) => stages::render(ctx, identity).await,
            None => not_found::render(&resolution.path),
        },
        ViewSelector::HostList => hosts::render(ctx).await,
        ViewSelector::Analytics => analytics::render(ctx).await,
        ViewSelector::Placeholder(label) => placeholder::render(label),
        ViewSelector::NotFound => not_found::render(&resolution.path),
    }
}
