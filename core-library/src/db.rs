//! Catalog database pool.
//!
//! [`create_pool`] opens the SQLite database behind a [`DatabaseConfig`],
//! applies the embedded migrations from `migrations/` and pings the pool
//! before handing it out. File databases run in WAL mode with foreign keys
//! enforced; in-memory databases are pinned to one connection since each
//! SQLite in-memory connection sees its own private database.
//!
//! ```rust,ignore
//! use core_library::db::{create_pool, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("catalog.db").max_connections(10)).await?;
//! ```

use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Database configuration for the SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx database URL, `sqlite:<path>` or `sqlite::memory:`
    pub database_url: String,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,

    /// Maximum lifetime of a connection
    pub max_lifetime: Option<Duration>,

    /// Maximum idle time for a connection before being closed
    pub idle_timeout: Option<Duration>,

    /// Number of prepared statements cached per connection
    pub statement_cache_capacity: usize,
}

impl DatabaseConfig {
    /// Create a configuration for the given database URL.
    ///
    /// A bare path is accepted as well and gets the `sqlite:` scheme prepended.
    ///
    /// ```
    /// use core_library::db::DatabaseConfig;
    ///
    /// assert_eq!(DatabaseConfig::new("catalog.db").database_url, "sqlite:catalog.db");
    /// assert_eq!(DatabaseConfig::new("sqlite:catalog.db").database_url, "sqlite:catalog.db");
    /// ```
    pub fn new(database_url: impl Into<String>) -> Self {
        let raw = database_url.into();
        let database_url = if raw.starts_with("sqlite:") {
            raw
        } else {
            format!("sqlite:{}", raw)
        };

        Self {
            database_url,
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(1800)), // 30 minutes
            idle_timeout: Some(Duration::from_secs(600)),  // 10 minutes
            statement_cache_capacity: 100,
        }
    }

    /// Create a configuration for an in-memory database (useful for testing).
    ///
    /// Every SQLite in-memory connection opens its own private database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY_URL.to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: None,
            idle_timeout: None,
            statement_cache_capacity: 100,
        }
    }

    /// Whether this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Set the minimum number of connections
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the maximum number of connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection acquire timeout
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Set the maximum connection lifetime
    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Set the idle timeout
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the statement cache capacity
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true)
        // 64MB page cache
        .pragma("cache_size", "-64000")
        .statement_cache_capacity(config.statement_cache_capacity);

    // WAL needs a file on disk.
    Ok(if config.is_in_memory() {
        options
    } else {
        options.journal_mode(SqliteJournalMode::Wal)
    })
}

/// Open the pool, migrate the schema and verify a connection answers.
///
/// # Errors
///
/// `Database` when the URL is malformed, the file cannot be opened or the
/// ping fails; `Migration` when a migration does not apply.
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    let max_connections = if config.is_in_memory() {
        1
    } else {
        config.max_connections
    };

    info!(
        in_memory = config.is_in_memory(),
        max_connections, "Opening catalog database"
    );

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections.min(max_connections))
        .max_connections(max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(connect_options(&config)?)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to open catalog database");
            LibraryError::Database(e)
        })?;

    migrate(&pool).await?;
    ping(&pool).await?;

    debug!(connections = pool.size(), "Catalog database ready");
    Ok(pool)
}

/// Create a connection pool for testing with an in-memory database
///
/// Migrations are already applied; the catalog tables are empty.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

async fn migrate(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        warn!(error = %e, "Migration failed");
        LibraryError::Migration(e.to_string())
    })
}

async fn ping(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
