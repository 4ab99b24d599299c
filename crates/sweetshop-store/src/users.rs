//! User accounts.

use crate::error::StoreError;
use sqlx::{FromRow, SqlitePool};
use sweetshop_core::{Role, User};
use uuid::Uuid;

/// A user together with the stored password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    password: String,
    role: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StoreError::CorruptRow(format!("user id '{}': {e}", row.id)))?;
        let role: Role = row
            .role
            .parse()
            .map_err(|e| StoreError::CorruptRow(format!("user '{}': {e}", row.username)))?;
        Ok(UserRecord {
            user: User {
                id,
                username: row.username,
                role,
            },
            password_hash: row.password,
        })
    }
}

/// Repository over the `users` table.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account. Fails with [`StoreError::UsernameTaken`] when the
    /// name is in use.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let id = Uuid::new_v4();
        let result = sqlx::query("INSERT INTO users (id, username, password, role) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(username)
            .bind(password_hash)
            .bind(role.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::info!(%id, username, %role, "created user");
                Ok(User {
                    id,
                    username: username.to_string(),
                    role,
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, role FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Change a user's role. Takes effect on the user's next login.
    pub async fn set_role(&self, username: &str, role: Role) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET role = ? WHERE username = ? RETURNING id, username, password, role",
        )
        .bind(role.as_str())
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let record = row
            .map(UserRecord::try_from)
            .transpose()?
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        tracing::info!(username, %role, "changed user role");
        Ok(record.user)
    }
}
