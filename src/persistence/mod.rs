//! Persistence Layer
//!
//! Storage for journaled trades and the per-user analytics cache.
//! Uses SQLite with async operations via sqlx.
//!
//! # Database Schema
//!
//! ## Trades Table
//! - id: UUID string
//! - user_id: Owning account
//! - symbol: Instrument ticker
//! - position: "long" or "short"
//! - entry_date / exit_date: Timestamps (exit nullable while open)
//! - entry_price / exit_price: Real (exit nullable)
//! - quantity: Real
//! - pnl: Nullable real, realized profit/loss
//! - fees: Nullable real
//! - strategy, broker, notes: Optional text
//! - tags: JSON array
//!
//! ## User Analytics Table
//! - user_id: Primary key
//! - one column per `MetricsSummary` field
//! - computed_at: Timestamp of the last recalculation

pub mod memory;
pub mod models;
pub mod repository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Database connection pool
pub type DbPool = SqlitePool;

/// Database initialization error
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://data/tradejournal.db")
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Enable query logging
    pub log_queries: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/tradejournal.db".to_string(),
            max_connections: 5,
            log_queries: cfg!(debug_assertions),
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory database, one connection so every query sees the same data
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            log_queries: false,
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.url);

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| (1..=100).contains(n))
            .unwrap_or(defaults.max_connections);

        let log_queries = std::env::var("DATABASE_LOG_QUERIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.log_queries);

        Self {
            url,
            max_connections,
            log_queries,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Initialize the database connection pool and run migrations
///
/// # Errors
/// Returns error if database connection fails or migrations fail
pub async fn init_database(config: &DatabaseConfig) -> Result<DbPool, DatabaseError> {
    info!("Initializing database: {}", config.url);

    if let Some(db_path) = config.url.strip_prefix("sqlite://") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::ConnectionError(sqlx::Error::Configuration(Box::new(e)))
                })?;
            }
        }
    }

    let mut options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
    if !config.log_queries {
        options = options.disable_statement_logging();
    }

    let max_connections = if config.is_in_memory() {
        1
    } else {
        config.max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    info!("✓ Database initialized successfully");

    Ok(pool)
}

/// Run database migrations
async fn run_migrations(pool: &DbPool) -> Result<(), DatabaseError> {
    info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trades (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            symbol TEXT NOT NULL,
            position TEXT NOT NULL CHECK(position IN ('long', 'short')),
            entry_date DATETIME NOT NULL,
            exit_date DATETIME,
            entry_price REAL NOT NULL,
            exit_price REAL,
            quantity REAL NOT NULL,
            pnl REAL,
            fees REAL,
            strategy TEXT,
            broker TEXT,
            notes TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create trades table: {}", e)))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_analytics (
            user_id TEXT PRIMARY KEY,
            win_rate REAL NOT NULL,
            total_pnl REAL NOT NULL,
            largest_win REAL NOT NULL,
            largest_loss REAL NOT NULL,
            average_win REAL NOT NULL,
            average_loss REAL NOT NULL,
            profit_factor REAL NOT NULL,
            total_trades INTEGER NOT NULL,
            winning_trades INTEGER NOT NULL,
            losing_trades INTEGER NOT NULL,
            computed_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::MigrationError(format!("Failed to create user_analytics table: {}", e))
    })?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_trades_user_id ON trades(user_id)")
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_analytics_total_pnl ON user_analytics(total_pnl DESC)",
    )
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    info!("✓ Database migrations completed successfully");

    Ok(())
}
