pub mod navigation;
pub mod pages;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::OpenApi;

use crate::config::CONFIG;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "LEAPP Reporting API"),
    paths(
        health_check,
        system_health,
        get_version,
        navigation::resolve_path,
        navigation::build_link,
        navigation::list_routes,
    ),
    components(schemas(
        SystemHealth,
        VersionInfo,
        navigation::ResolveResponse,
        navigation::LinkResponse,
        navigation::RouteInfo,
    )),
    tags(
        (name = "System", description = "Health and build information"),
        (name = "Navigation", description = "Route resolution and link building")
    )
)]
pub struct ApiDoc;

/// Create the main router: JSON API under /api, HTML pages everywhere else
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/system/health", get(system_health))
        .route("/api/system/version", get(get_version))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/navigation", navigation::navigation_routes())
        .fallback(pages::render_page)
        .with_state(state)
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SystemHealth {
    /// `ok` or `degraded`
    pub status: String,
    /// `reachable` or `unreachable`
    pub data_service: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VersionInfo {
    pub version: String,
    pub commit_hash: String,
    pub build_time: String,
    pub channel: String,
    pub refresh_cadence_minutes: u64,
    pub backend: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "System",
    responses((status = 200, body = String))
)]
pub async fn health_check() -> &'static str {
    "OK"
}

/// Health including data service reachability
#[utoipa::path(
    get,
    path = "/api/system/health",
    tag = "System",
    responses((status = 200, body = SystemHealth))
)]
pub async fn system_health(State(state): State<AppState>) -> Json<SystemHealth> {
    let reachable = tokio::time::timeout(state.fetch_timeout, state.data.ping())
        .await
        .unwrap_or(false);

    if !reachable {
        tracing::warn!("Data service is unreachable");
    }

    Json(SystemHealth {
        status: if reachable { "ok" } else { "degraded" }.to_string(),
        data_service: if reachable { "reachable" } else { "unreachable" }.to_string(),
    })
}

/// Version info endpoint
#[utoipa::path(
    get,
    path = "/api/system/version",
    tag = "System",
    responses((status = 200, body = VersionInfo))
)]
pub async fn get_version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(VersionInfo {
        version: CONFIG.version.clone(),
        commit_hash: CONFIG.commit_hash.clone(),
        build_time: CONFIG.build_time.clone(),
        channel: CONFIG.channel.clone(),
        refresh_cadence_minutes: state.staleness.cadence_minutes(),
        backend: "rust".to_string(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
