//! Table definitions.
//!
//! Prices are stored as integer cents in `price_cents`.

use crate::error::StoreError;
use sqlx::SqlitePool;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id       TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role     TEXT NOT NULL CHECK (role IN ('admin', 'user'))
);

CREATE TABLE IF NOT EXISTS sweets (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category    TEXT NOT NULL,
    price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
    quantity    INTEGER NOT NULL CHECK (quantity >= 0)
);

CREATE INDEX IF NOT EXISTS sweets_category_idx ON sweets (category);
"#;

/// Create tables that do not exist yet.
pub async fn init(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    tracing::info!("schema ready (users, sweets)");
    Ok(())
}
