//! HTTP router for the monitoring API.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/` and wrapped by the request logger.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the monitoring API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/templates",
            get(endpoints::templates::list).post(endpoints::templates::create),
        )
        .route("/templates/:id", get(endpoints::templates::detail))
        .route("/readings", post(endpoints::readings::record))
        .route(
            "/patients/:patient_id/readings",
            get(endpoints::readings::list),
        )
        .route("/patients/:patient_id/trend", get(endpoints::readings::trend))
        .route("/patients/:patient_id/alerts", get(endpoints::alerts::list))
        .route("/alerts/:id/acknowledge", post(endpoints::alerts::acknowledge))
        .route("/alerts/:id/resolve", post(endpoints::alerts::resolve))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_request));

    Router::new().nest("/api", api)
}
