//! # sweetshop-store
//!
//! SQLite persistence for the Sweet Shop.
//!
//! The pool returned by [`open`] is the only shared mutable resource of the
//! server. Repositories hold a clone of it and issue one statement per
//! operation; stock changes are single conditional `UPDATE ... RETURNING`
//! statements so concurrent purchases of the same row cannot lose updates or
//! drive stock below zero.

pub mod error;
pub mod schema;
pub mod sweets;
pub mod users;

pub use error::StoreError;
pub use sweets::SweetStore;
pub use users::{UserRecord, UserStore};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Path value selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// How to reach the database.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// SQLite file, created on first use, or [`IN_MEMORY`].
    pub sqlite_path: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sqlite_path: "data/sweetshop.sqlite".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreOptions {
    pub fn in_memory() -> Self {
        Self {
            sqlite_path: IN_MEMORY.to_string(),
            ..Self::default()
        }
    }
}

/// Open a connection pool.
pub async fn open(options: &StoreOptions) -> Result<SqlitePool, StoreError> {
    if options.sqlite_path == IN_MEMORY {
        // Every connection to :memory: is a separate database, so pin one
        // connection for the life of the pool.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(SqliteConnectOptions::new().in_memory(true))
            .await?;
        return Ok(pool);
    }

    ensure_parent_dir(&options.sqlite_path)?;
    let connect = SqliteConnectOptions::new()
        .filename(&options.sqlite_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections.max(1))
        .acquire_timeout(options.acquire_timeout)
        .connect_with(connect)
        .await?;

    tracing::info!(path = %options.sqlite_path, "opened sqlite database");
    Ok(pool)
}

/// Open a pool and make sure the schema exists.
pub async fn open_and_init(options: &StoreOptions) -> Result<SqlitePool, StoreError> {
    let pool = open(options).await?;
    schema::init(&pool).await?;
    Ok(pool)
}

fn ensure_parent_dir(file_path: &str) -> Result<(), StoreError> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    open_and_init(&StoreOptions::in_memory())
        .await
        .expect("in-memory database")
}
