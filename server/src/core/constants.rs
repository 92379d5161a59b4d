// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Finance Tracker";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".finance-tracker";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "finance-tracker.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FINANCE_TRACKER_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "FINANCE_TRACKER_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "FINANCE_TRACKER_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FINANCE_TRACKER_LOG";

/// Default log filter when neither FINANCE_TRACKER_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,finance_tracker_server=info";

/// Environment variable for extra allowed CORS origins (comma-separated)
pub const ENV_CORS_ORIGINS: &str = "FINANCE_TRACKER_CORS_ORIGINS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// Request Limits
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Maximum number of entities accepted by a single create request
pub const MAX_CREATE_BATCH: usize = 500;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "FINANCE_TRACKER_POSTGRES_URL";

/// Environment variable for PostgreSQL max pool size
pub const ENV_POSTGRES_MAX_CONNECTIONS: &str = "FINANCE_TRACKER_POSTGRES_MAX_CONNECTIONS";

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// PostgreSQL URL used when none is configured
pub const POSTGRES_DEFAULT_URL: &str = "postgres://postgres@localhost:5432/finance_tracker";

/// PostgreSQL default max connections
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL default min connections (keep warm for low latency)
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// PostgreSQL default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL idle connection timeout in seconds (release unused connections)
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// PostgreSQL max connection lifetime in seconds (cycle connections to prevent stale state)
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// PostgreSQL statement timeout in seconds (prevent runaway queries, 0 = disabled)
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between background `SELECT 1` pings
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;
