//! PostgreSQL database service
//!
//! Owns the connection pool shared by every repository:
//! - Connection pooling with min/max bounds
//! - Idle connection cleanup
//! - Connection lifetime cycling
//! - Query timeout protection
//!
//! The schema is provisioned outside this service; nothing here creates or
//! alters tables.

pub mod error;
pub mod query;
pub mod repositories;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
    POSTGRES_HEALTH_CHECK_INTERVAL_SECS,
};

/// Pool sizing and timeouts with config overrides applied over defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub statement_timeout_secs: u64,
}

fn or_default<T: Default + PartialEq>(value: T, default: T) -> T {
    if value == T::default() { default } else { value }
}

impl PoolSettings {
    pub(crate) fn from_config(config: &PostgresConfig) -> Self {
        Self {
            max_connections: or_default(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS),
            min_connections: or_default(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: or_default(
                config.acquire_timeout_secs,
                POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
            ),
            idle_timeout_secs: or_default(config.idle_timeout_secs, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime_secs: or_default(config.max_lifetime_secs, POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
            statement_timeout_secs: or_default(
                config.statement_timeout_secs,
                POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
            ),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
    }
}

/// Parse the configured URL into connect options with statement logging and timeout
fn connect_options(config: &PostgresConfig, settings: &PoolSettings) -> Result<PgConnectOptions, PostgresError> {
    if config.url.is_empty() {
        return Err(PostgresError::Config("PostgreSQL URL is required".into()));
    }

    let mut options: PgConnectOptions = config
        .url
        .parse()
        .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

    options = options.log_statements(LevelFilter::Trace);

    if settings.statement_timeout_secs > 0 {
        options = options.options([(
            "statement_timeout",
            format!("{}s", settings.statement_timeout_secs),
        )]);
    }
    Ok(options)
}

/// PostgreSQL database service
///
/// Created once at server startup and shared with the API through `Arc`.
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Connect to PostgreSQL and warm the pool
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let settings = PoolSettings::from_config(config);
        let options = connect_options(config, &settings)?;

        let pool = settings.pool_options().connect_with(options).await?;

        tracing::debug!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            acquire_timeout_secs = settings.acquire_timeout_secs,
            idle_timeout_secs = settings.idle_timeout_secs,
            max_lifetime_secs = settings.max_lifetime_secs,
            statement_timeout_secs = settings.statement_timeout_secs,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    /// Build the pool without opening any connection until first use
    pub fn connect_lazy(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let settings = PoolSettings::from_config(config);
        let options = connect_options(config, &settings)?;
        let pool = settings.pool_options().connect_lazy_with(options);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }

    /// Start a background task that pings the database until shutdown
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(POSTGRES_HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("PostgreSQL health check task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.ping().await {
                            tracing::warn!("PostgreSQL health check failed: {}", e);
                        }
                    }
                }
            }
        })
    }

    /// Round-trip a trivial statement to verify connectivity
    pub async fn ping(&self) -> Result<(), PostgresError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
