use std::net::IpAddr;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::FixedOffset;
use http_body_util::BodyExt;
use sigma_bot::config::BotConfig;
use sigma_bot::state::AppContext;
use sigma_core::reply::UserDisplay;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Build a test `BotConfig` with safe defaults and the standard reward.
pub fn test_config() -> BotConfig {
    BotConfig {
        discord_token: "test-token".to_string(),
        database_url: "sqlite::memory:".to_string(),
        daily_reward: 100_000,
        welcome_channel_id: None,
        guild_id: None,
        utc_offset: FixedOffset::east_opt(0).unwrap(),
        db_timeout_secs: 5,
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        request_timeout_secs: 10,
    }
}

/// Application context over a test database, with the schema applied.
pub async fn test_context(pool: SqlitePool) -> AppContext {
    sigma_db::run_migrations(&pool).await.unwrap();
    AppContext::new(pool, test_config())
}

#[allow(dead_code)]
pub fn display(user_id: i64) -> UserDisplay {
    UserDisplay {
        mention: format!("<@{user_id}>"),
        name: format!("user{user_id}"),
        avatar_url: None,
    }
}

/// Send a GET request through the router.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as UTF-8 text.
#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
