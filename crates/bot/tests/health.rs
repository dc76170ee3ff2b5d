//! Integration tests for the liveness server routes.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_text, get};
use sigma_bot::config::BotConfig;
use sigma_bot::error::BotError;
use sigma_bot::server::{self, build_router};
use sqlx::SqlitePool;

#[sqlx::test(migrations = false)]
async fn root_answers_ok(pool: SqlitePool) {
    let app = build_router(common::test_context(pool).await);

    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[sqlx::test(migrations = false)]
async fn health_reports_database_status(pool: SqlitePool) {
    let app = build_router(common::test_context(pool).await);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = false)]
async fn health_is_degraded_when_database_is_closed(pool: SqlitePool) {
    let ctx = common::test_context(pool).await;
    ctx.pool.close().await;
    let app = build_router(ctx);

    let json: serde_json::Value =
        serde_json::from_str(&body_text(get(app, "/health").await).await).unwrap();

    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[sqlx::test(migrations = false)]
async fn unknown_route_returns_404(pool: SqlitePool) {
    let app = build_router(common::test_context(pool).await);

    let response = get(app, "/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bind_reports_the_bound_address() {
    let config = common::test_config();

    let listener = server::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    assert_eq!(addr.ip(), config.host);
    assert_ne!(addr.port(), 0);
}

#[tokio::test]
async fn bind_fails_when_port_is_taken() {
    let first = server::bind(&common::test_config()).await.unwrap();
    let config = BotConfig {
        port: first.local_addr().unwrap().port(),
        ..common::test_config()
    };

    assert_matches!(server::bind(&config).await, Err(BotError::Io(_)));
}
