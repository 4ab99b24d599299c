use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};
use sweetshop_store::StoreOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allow any origin. The terminal front end does not need CORS at all;
    /// browsers served from another origin do.
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, or ":memory:".
    #[serde(default = "default_db_path")]
    pub sqlite_path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_db_path() -> String {
    "data/sweetshop.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_db_path(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            sqlite_path: self.sqlite_path.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token lifetime as a humantime string, e.g. "1h" or "30m".
    #[serde(default = "default_token_ttl")]
    pub token_ttl: String,

    /// Hex private key. For security: prefer env `SWEETSHOP_TOKEN_PRIVATE_KEY`.
    #[serde(default)]
    pub private_key: Option<String>,

    /// File holding the hex private key (see `sweetshop keys generate`).
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    #[serde(default)]
    pub admin: AdminConfig,
}

fn default_token_ttl() -> String {
    "1h".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl: default_token_ttl(),
            private_key: None,
            private_key_file: None,
            admin: AdminConfig::default(),
        }
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> anyhow::Result<chrono::Duration> {
        let ttl = humantime::parse_duration(&self.token_ttl)
            .with_context(|| format!("invalid [auth].token_ttl '{}'", self.token_ttl))?;
        if ttl.is_zero() {
            anyhow::bail!("[auth].token_ttl must be greater than zero");
        }
        chrono::Duration::from_std(ttl).context("[auth].token_ttl is too large")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Initial admin password, used only while the users table is empty.
    /// Empty disables the bootstrap. Prefer env `SWEETSHOP_ADMIN_PASSWORD`.
    #[serde(default)]
    pub password: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Apply `SWEETSHOP_*` overrides from `lookup` on top of the file values.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("SWEETSHOP_BIND") {
            self.server.bind = bind;
        }
        if let Some(path) = lookup("SWEETSHOP_DATABASE_PATH") {
            self.database.sqlite_path = path;
        }
        if let Some(key) = lookup("SWEETSHOP_TOKEN_PRIVATE_KEY") {
            self.auth.private_key = Some(key);
        }
        if let Some(password) = lookup("SWEETSHOP_ADMIN_PASSWORD") {
            self.auth.admin.password = password;
        }
        if let Some(level) = lookup("SWEETSHOP_LOG") {
            self.logging.level = level;
        }
    }
}

/// Read the config file (a missing file means defaults) and apply the
/// environment on top.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = config_path();
    let mut cfg = if path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        AppConfig::default()
    };
    cfg.apply_overrides(|key| env::var(key).ok());
    Ok(cfg)
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("SWEETSHOP_SERVER_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            bind = "127.0.0.1:9000"

            [auth]
            token_ttl = "30m"

            [auth.admin]
            password = "from-file"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert!(cfg.server.cors_permissive);
        assert_eq!(cfg.database.sqlite_path, "data/sweetshop.sqlite");
        assert_eq!(cfg.auth.admin.username, "admin");
        assert_eq!(cfg.auth.admin.password, "from-file");
        assert_eq!(cfg.auth.token_ttl().unwrap(), chrono::Duration::minutes(30));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("SWEETSHOP_BIND", "0.0.0.0:1234"),
            ("SWEETSHOP_DATABASE_PATH", ":memory:"),
            ("SWEETSHOP_ADMIN_PASSWORD", "from-env"),
            ("SWEETSHOP_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.server.bind, "0.0.0.0:1234");
        assert_eq!(cfg.database.sqlite_path, ":memory:");
        assert_eq!(cfg.auth.admin.password, "from-env");
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.auth.private_key.is_none());
    }

    #[test]
    fn token_ttl_is_validated() {
        let mut auth = AuthConfig::default();
        assert_eq!(auth.token_ttl().unwrap(), chrono::Duration::hours(1));

        auth.token_ttl = "soon".into();
        assert!(auth.token_ttl().is_err());

        auth.token_ttl = "0s".into();
        assert!(auth.token_ttl().is_err());
    }
}
