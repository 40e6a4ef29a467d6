use axum::{Router, middleware, routing::get};
use axum_helpers::server::health_router;
use observability::{metrics_handler, metrics_middleware};
use std::io;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod health;
pub mod stats;

/// Full service router: stats, `/health`, `/ready` and `/metrics` behind the
/// shared docs, tracing, security-header and compression layers.
pub fn app_router(state: &AppState) -> io::Result<Router> {
    let routes = routes(state)
        .merge(health_router(state.config.app.clone()))
        .merge(ready_router(state.clone()))
        .merge(metrics_router());

    axum_helpers::create_router::<ApiDoc>(routes)
}

/// Stats API routes, served at the root and instrumented with request metrics.
pub fn routes(state: &AppState) -> Router {
    stats::router(state).layer(middleware::from_fn(metrics_middleware))
}

/// `/ready` with a real database check when Postgres-backed.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Prometheus exposition at `/metrics`.
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}
