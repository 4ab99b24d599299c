use crate::auth::password::hash_password;
use crate::config::AppConfig;
use sweetshop_core::{Role, User};
use sweetshop_store::UserStore;

/// On startup, if the users table is empty, create the configured admin.
///
/// Password source (highest precedence first):
/// - env `SWEETSHOP_ADMIN_PASSWORD`
/// - `config.toml` `[auth.admin].password`
///
/// With no password configured nothing is created; use `sweetshop promote`
/// to grant the role to a registered user instead.
pub async fn bootstrap_admin(users: &UserStore, cfg: &AppConfig) -> anyhow::Result<Option<User>> {
    if users.count().await? > 0 {
        return Ok(None);
    }

    let admin = &cfg.auth.admin;
    if admin.password.trim().is_empty() {
        tracing::info!("no users yet and no admin password configured; skipping admin bootstrap");
        return Ok(None);
    }

    let hash = hash_password(admin.password.clone()).await?;
    let user = users.create(&admin.username, &hash, Role::Admin).await?;

    tracing::warn!(
        username = %user.username,
        "bootstrapped admin user (password taken from env/config)"
    );
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweetshop_store::{StoreOptions, open_and_init};

    async fn users() -> UserStore {
        UserStore::new(open_and_init(&StoreOptions::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn creates_admin_once() {
        let users = users().await;
        let mut cfg = AppConfig::default();
        cfg.auth.admin.password = "changeme".into();

        let created = bootstrap_admin(&users, &cfg).await.unwrap().unwrap();
        assert_eq!(created.username, "admin");
        assert_eq!(created.role, Role::Admin);

        assert!(bootstrap_admin(&users, &cfg).await.unwrap().is_none());
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn skips_without_password() {
        let users = users().await;
        assert!(bootstrap_admin(&users, &AppConfig::default()).await.unwrap().is_none());
        assert_eq!(users.count().await.unwrap(), 0);
    }
}
