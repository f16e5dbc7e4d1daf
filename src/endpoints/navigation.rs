use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::navigation::{NavigationError, WorkflowIdentity, ROUTE_TABLE};
use crate::state::AppState;

/// Create navigation routes
pub fn navigation_routes() -> Router<AppState> {
    Router::new()
        .route("/resolve", get(resolve_path))
        .route("/link", get(build_link))
        .route("/routes", get(list_routes))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveQuery {
    /// Path to resolve, e.g. `/workflows/host01/3f9a-tx/stages`
    pub path: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ResolveResponse {
    pub view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<WorkflowIdentity>,
    pub path: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LinkQuery {
    pub view: String,
    /// Required for placeholder views
    pub label: Option<String>,
    pub hostname: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LinkResponse {
    pub url: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RouteInfo {
    pub pattern: String,
    pub view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Resolve a path to the view it selects
#[utoipa::path(
    get,
    path = "/api/navigation/resolve",
    tag = "Navigation",
    params(ResolveQuery),
    responses(
        (status = 200, body = ResolveResponse),
        (status = 400, description = "Missing path parameter")
    )
)]
pub async fn resolve_path(
    query: std::result::Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<Json<ResolveResponse>> {
    let Query(query) = query?;
    let resolution = ROUTE_TABLE.resolve(&query.path);
    Ok(Json(ResolveResponse {
        view: resolution.view.name().to_string(),
        label: resolution.view.label().map(str::to_string),
        identity: resolution.identity,
        path: resolution.path,
    }))
}

/// Build the canonical URL for a view
#[utoipa::path(
    get,
    path = "/api/navigation/link",
    tag = "Navigation",
    params(LinkQuery),
    responses(
        (status = 200, body = LinkResponse),
        (status = 400, description = "Unknown view, missing view or malformed identity")
    )
)]
pub async fn build_link(
    query: std::result::Result<Query<LinkQuery>, QueryRejection>,
) -> Result<Json<LinkResponse>> {
    let Query(query) = query?;
    let view = ROUTE_TABLE
        .view_named(&query.view, query.label.as_deref())
        .ok_or_else(|| AppError::BadRequest(format!("Unknown view: {}", query.view)))?;

    let identity = if view.requires_identity() {
        Some(
            WorkflowIdentity::new(
                query.hostname.unwrap_or_default(),
                query.transaction_id.unwrap_or_default(),
            )
            .map_err(NavigationError::from)?,
        )
    } else {
        None
    };

    let url = ROUTE_TABLE.link_to(view, identity.as_ref())?;
    Ok(Json(LinkResponse { url }))
}

/// List the route table in matching order
#[utoipa::path(
    get,
    path = "/api/navigation/routes",
    tag = "Navigation",
    responses(
        (status = 200, body = Vec<RouteInfo>)
    )
)]
pub async fn list_routes() -> Json<Vec<RouteInfo>> {
    Json(
        ROUTE_TABLE
            .entries()
            .iter()
            .map(|entry| RouteInfo {
                pattern: entry.pattern(),
                view: entry.view().name().to_string(),
                label: entry.view().label().map(str::to_string),
            })
            .collect(),
    )
}
