//! Health, diagnostics and fallback handlers.

use crate::config::VERSION;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::PoolStats;
use axum::{extract::State, http::Method, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
    system_info: SystemInfo,
}

#[derive(Serialize)]
struct SystemInfo {
    environment: &'static str,
    version: &'static str,
}

pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "available",
        system_info: SystemInfo {
            environment: state.config.env.as_str(),
            version: VERSION,
        },
    })
}

#[derive(Serialize)]
pub struct DebugVars {
    version: &'static str,
    timestamp: i64,
    database: Option<PoolStats>,
}

pub async fn debug_vars(State(state): State<AppState>) -> Json<DebugVars> {
    Json(DebugVars {
        version: VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        database: state.movies.pool_stats(),
    })
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
