use crate::{auth::bootstrap::bootstrap_admin, config::AppConfig};
use anyhow::Context;
use sqlx::SqlitePool;
use sweetshop_biscuit::{KeyPair, TokenBuilder, TokenVerifier};
use sweetshop_store::{SweetStore, UserStore};

/// Shared application state.
///
/// The pool is the only mutable resource shared between requests; everything
/// else is read-only after start-up.
pub struct AppState {
    pub cfg: AppConfig,
    pub pool: SqlitePool,
    pub sweets: SweetStore,
    pub users: UserStore,
    pub tokens: TokenBuilder,
    pub verifier: TokenVerifier,
    pub token_ttl: chrono::Duration,
}

impl AppState {
    /// Open the database, create the schema, load the signing key and
    /// bootstrap the admin account.
    pub async fn init(cfg: &AppConfig) -> anyhow::Result<Self> {
        let pool = sweetshop_store::open_and_init(&cfg.database.store_options())
            .await
            .context("failed to initialise database schema")?;

        let keypair = load_keypair(cfg)?;
        let state = Self::new(cfg.clone(), pool, keypair)?;

        bootstrap_admin(&state.users, cfg).await?;
        Ok(state)
    }

    pub fn new(cfg: AppConfig, pool: SqlitePool, keypair: KeyPair) -> anyhow::Result<Self> {
        let token_ttl = cfg.auth.token_ttl()?;
        let tokens = TokenBuilder::new(keypair);
        let verifier = tokens.verifier();

        Ok(Self {
            cfg,
            sweets: SweetStore::new(pool.clone()),
            users: UserStore::new(pool.clone()),
            pool,
            tokens,
            verifier,
            token_ttl,
        })
    }
}

/// Key source (highest precedence first): `[auth].private_key` (or env
/// `SWEETSHOP_TOKEN_PRIVATE_KEY`), `[auth].private_key_file`, then a fresh
/// ephemeral key.
fn load_keypair(cfg: &AppConfig) -> anyhow::Result<KeyPair> {
    if let Some(hex) = cfg.auth.private_key.as_deref() {
        return KeyPair::from_private_key_hex(hex).context("invalid token private key");
    }
    if let Some(path) = &cfg.auth.private_key_file {
        return KeyPair::load_from_file(path)
            .with_context(|| format!("failed to load token key from {}", path.display()));
    }

    let keypair = KeyPair::generate()?;
    tracing::warn!(
        public_key = %keypair.public_key_hex(),
        "no token key configured; using an ephemeral key, issued tokens will not survive a restart"
    );
    Ok(keypair)
}
