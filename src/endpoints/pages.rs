//! HTML pages. Every non-API path lands here; one request is one navigation
//! event resolved against the route table.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::config::CONFIG;
use crate::error::AppError;
use crate::models::{max_page, AnalyticsInterval, WorkflowFilter};
use crate::navigation::{RouteStore, ViewSelector};
use crate::shell;
use crate::state::AppState;
use crate::views::{self, FilterForm, ViewContext, ViewParams};

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(length(max = 255, message = "Hostname filter is too long"))]
    pub hostname: Option<String>,
    #[validate(length(max = 64, message = "Region filter is too long"))]
    pub region: Option<String>,
    #[validate(length(max = 128, message = "Workflow type filter is too long"))]
    pub workflow_type: Option<String>,
    #[validate(length(max = 255, message = "Failed stage filter is too long"))]
    pub failure_stage: Option<String>,
    #[validate(length(max = 255, message = "Error filter is too long"))]
    pub error: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
    pub interval: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(label: &str, value: &Option<String>) -> Result<Option<NaiveDate>, String> {
    non_empty(value)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| format!("{} must be a date like 2024-03-01", label))
        })
        .transpose()
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            errors
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{} is invalid", field))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

impl PageQuery {
    fn to_filter(&self, page_size: u32) -> Result<WorkflowFilter, String> {
        self.validate().map_err(|e| validation_message(&e))?;

        let started_from = parse_date("Started from", &self.from)?;
        let started_to = parse_date("Started to", &self.to)?;
        if let (Some(from), Some(to)) = (started_from, started_to) {
            if from > to {
                return Err("Started from must not be after Started to".to_string());
            }
        }

        let page = match non_empty(&self.page) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| "Page must be a positive number".to_string())?,
            None => 1,
        };
        let last_page = max_page(page_size);
        if page > last_page {
            return Err(format!("Page must be at most {}", last_page));
        }

        Ok(WorkflowFilter {
            hostname: non_empty(&self.hostname),
            region: non_empty(&self.region),
            workflow_type: non_empty(&self.workflow_type),
            failure_stage: non_empty(&self.failure_stage),
            error: non_empty(&self.error),
            started_from,
            started_to,
            page,
        })
    }

    /// Form echo, validated filter and interval for a list paged by `page_size`
    pub fn into_params(self, page_size: u32) -> ViewParams {
        let filter = self.to_filter(page_size);
        let interval = self
            .interval
            .as_deref()
            .and_then(AnalyticsInterval::parse)
            .unwrap_or_default();

        ViewParams {
            form: FilterForm {
                hostname: self.hostname.unwrap_or_default(),
                region: self.region.unwrap_or_default(),
                workflow_type: self.workflow_type.unwrap_or_default(),
                failure_stage: self.failure_stage.unwrap_or_default(),
                error: self.error.unwrap_or_default(),
                from: self.from.unwrap_or_default(),
                to: self.to.unwrap_or_default(),
            },
            filter,
            interval,
        }
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Render the page for the request path
pub async fn render_page(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let path = uri.path();

    if path == "/api" || path.starts_with("/api/") {
        return AppError::NotFound(format!("No API endpoint at {}", path)).into_response();
    }

    if method != Method::GET && method != Method::HEAD {
        let mut response =
            AppError::MethodNotAllowed(format!("{} is not supported for pages", method))
                .into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        return response;
    }

    let params = match query {
        Ok(Query(query)) => query.into_params(CONFIG.datasource.page_size),
        Err(rejection) => ViewParams {
            filter: Err(rejection.body_text()),
            ..ViewParams::default()
        },
    };

    let store = RouteStore::new(path);
    let route = store.current();
    tracing::debug!("Rendering {} as {}", path, route.resolution.view.name());

    let ctx = ViewContext {
        state: &state,
        store: &store,
        route: &route,
        params: &params,
    };
    let view = views::render(&ctx).await;
    let page = shell::render_page(&route.resolution, &view, &state.staleness);

    let status = if route.resolution.view == ViewSelector::NotFound {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    (status, Html(page)).into_response()
}
