//! Drill-down navigation: identities, the route table, resolution and the
//! current-route store.

pub mod controller;
pub mod identity;
pub mod routes;
pub mod store;

pub use controller::{
    href, link_to, normalize_path, resolve, stage_trace_href, NavigationError, Resolution,
};
pub use identity::{IdentityField, MalformedIdentity, WorkflowIdentity};
pub use routes::{RouteEntry, RouteTable, ViewSelector, ROUTE_TABLE};
pub use store::{RouteStore, VersionedRoute};
