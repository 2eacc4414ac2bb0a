//! SQLite persistence layer for the storefront support chat.
//!
//! This crate provides async database operations for users, sessions, and
//! customer-support conversations using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, message, models::SenderRole, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:storefront.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // First contact creates the customer's conversation
//!     let conv = conversation::get_or_create(db.pool(), 42, "13800000000").await?;
//!     message::append(db.pool(), conv.id, SenderRole::Customer, "Hello", None).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod conversation;
pub mod message;
pub mod summary;
pub mod session;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{Conversation, ConversationSummary, Identity, Message, SenderRole, User};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/storefront.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting, before the server starts
    /// taking requests, so handlers never have to probe for schema state.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Check connectivity with a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Current UTC time as an RFC 3339 string with microsecond precision.
///
/// Timestamps in this format sort lexicographically, so SQL `ORDER BY` over
/// these TEXT columns matches chronological order.
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
