//! Common routes: health check and diagnostics.

use crate::handlers::{debug_vars, healthcheck, method_not_allowed};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /v1/healthcheck, GET /debug/vars.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/healthcheck", get(healthcheck).fallback(method_not_allowed))
        .route("/debug/vars", get(debug_vars).fallback(method_not_allowed))
        .with_state(state)
}
