//! Liveness HTTP server.
//!
//! Hosting platforms that expect a bound port consider the process alive as
//! long as this answers. It shares the application context only to report
//! database health.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::BotConfig;
use crate::error::BotError;
use crate::routes;
use crate::state::AppContext;

/// Build the router with its middleware stack.
pub fn build_router(ctx: AppContext) -> Router {
    let timeout = Duration::from_secs(ctx.config.request_timeout_secs);

    Router::new()
        .merge(routes::health::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(ctx)
}

/// Bind the configured liveness address.
///
/// Called before the server task is spawned so a bind failure stops startup.
pub async fn bind(config: &BotConfig) -> Result<TcpListener, BotError> {
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Liveness server listening");
    Ok(listener)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, ctx: AppContext, shutdown: F) -> Result<(), BotError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(ctx))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Liveness server stopped");
    Ok(())
}
