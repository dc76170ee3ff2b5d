use std::sync::Arc;

use crate::config::BotConfig;

/// Shared application context handed to every event handler and to the
/// liveness server.
///
/// Cheaply cloneable (the pool is reference-counted, config is behind `Arc`).
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub pool: sigma_db::DbPool,
    /// Bot configuration loaded at startup.
    pub config: Arc<BotConfig>,
}

impl AppContext {
    pub fn new(pool: sigma_db::DbPool, config: BotConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
