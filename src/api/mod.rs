//! REST surface — maps HTTP requests to gateway operations.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /api/projects` — create; 201 with the public view, 400 with
//!   field details on validation failure.
//! - `GET /api/projects` — paginated public (or own) listing with
//!   `page`/`limit`/`search`/`tags`/`sortBy`/`sortOrder`/`userId`.
//! - `GET /api/projects/:id` — public view; 403 private non-owner, 404
//!   absent; counts a view for non-owners.
//! - `PUT` / `DELETE /api/projects/:id` — owner only, 403 otherwise.
//! - `POST /api/projects/:id/fork`, `POST /api/projects/:id/like`.
//! - `GET /health` — `{ "ok": true }`.
//!
//! Every response shares the `{success, message?, data?, details?}`
//! envelope. The caller's identity arrives as the `x-actor-id` header,
//! forwarded by the upstream identity layer after token verification —
//! this service never sees credentials.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use codepod::api;
//! use codepod::gateway::ProjectStore;
//! use codepod::store::InMemoryStore;
//!
//! let projects = Arc::new(ProjectStore::new(InMemoryStore::new()));
//!
//! // Get the router to compose with other axum routes
//! let app = api::router(projects.clone());
//!
//! // Or serve directly
//! api::serve(projects, "0.0.0.0:3000").await?;
//! ```

mod envelope;
mod projects;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::gateway::ProjectStore;
use crate::store::DocumentStore;

pub use envelope::Envelope;

/// Header carrying the verified actor id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Build an axum `Router` serving the project API over the given gateway.
pub fn router<S: DocumentStore + 'static>(projects: Arc<ProjectStore<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/projects",
            get(projects::list::<S>).post(projects::create::<S>),
        )
        .route(
            "/api/projects/:id",
            get(projects::get_one::<S>)
                .put(projects::update::<S>)
                .delete(projects::remove::<S>),
        )
        .route("/api/projects/:id/fork", post(projects::fork::<S>))
        .route("/api/projects/:id/like", post(projects::like::<S>))
        .with_state(projects)
}

/// Serve the API over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: DocumentStore + 'static>(
    projects: Arc<ProjectStore<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(projects);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `GET /health`
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// Extract the verified actor id from request headers, if present.
pub(crate) fn actor_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
