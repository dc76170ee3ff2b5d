use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sigma_bot::config::BotConfig;
use sigma_bot::error::BotError;
use sigma_bot::state::AppContext;
use sigma_bot::{discord, server};

#[tokio::main]
async fn main() -> Result<(), BotError> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "sigma_bot=debug,sigma_db=debug,tower_http=debug,serenity=warn".into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };
    tracing::info!(
        daily_reward = config.daily_reward,
        utc_offset = %config.utc_offset,
        port = config.port,
        "Loaded bot configuration",
    );

    // --- Database ---
    let pool = sigma_db::create_pool(&config.database_url, config.db_timeout()).await?;
    tracing::info!("Database connection pool created");

    sigma_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    sigma_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let app = AppContext::new(pool, config);

    // --- Liveness server ---
    let listener = server::bind(&app.config).await?;
    let liveness_app = app.clone();
    let liveness_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, liveness_app, shutdown_signal()).await {
            tracing::error!(error = %e, "Liveness server failed");
        }
    });

    // --- Discord client ---
    let mut client = discord::build_client(app.clone()).await?;
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, closing gateway connections");
        shard_manager.shutdown_all().await;
    });

    tracing::info!("Connecting to Discord");
    let result = client.start().await;

    // --- Post-shutdown cleanup ---
    liveness_handle.abort();
    app.pool.close().await;
    tracing::info!("Shutdown complete");

    result.map_err(|e| {
        tracing::error!(error = %e, "Discord client stopped with an error");
        BotError::from(e)
    })
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
