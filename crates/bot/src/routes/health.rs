use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppContext;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET / -- plain liveness probe for the hosting platform.
async fn liveness() -> &'static str {
    "OK"
}

/// GET /health -- returns service and database health.
async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    let db_healthy = sigma_db::health_check(&ctx.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
}
