//! `sweetshop promote` - change a user's role directly in the database.

use anyhow::Context;
use sweetshop_core::{Role, User};
use sweetshop_store::{StoreOptions, UserStore, open_and_init};

pub async fn promote(database: &str, username: &str, role: Role) -> anyhow::Result<User> {
    let pool = open_and_init(&StoreOptions {
        sqlite_path: database.to_string(),
        ..StoreOptions::default()
    })
    .await?;
    let result = UserStore::new(pool.clone())
        .set_role(username, role)
        .await
        .with_context(|| format!("failed to set role of '{username}'"));
    pool.close().await;

    let user = result?;
    println!("✔ {} is now {} (takes effect at next login)", user.username, user.role);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn promotes_existing_user_only() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("shop.sqlite").to_string_lossy().into_owned();

        let pool = open_and_init(&StoreOptions {
            sqlite_path: db.clone(),
            ..StoreOptions::default()
        })
        .await
        .unwrap();
        UserStore::new(pool.clone())
            .create("carol", "hash", Role::User)
            .await
            .unwrap();
        pool.close().await;

        let user = promote(&db, "carol", Role::Admin).await.unwrap();
        assert_eq!(user.role, Role::Admin);

        assert!(promote(&db, "nobody", Role::Admin).await.is_err());
    }
}
