//! CLI command implementations for the Sweet Shop.

pub mod account;
pub mod browse;
pub mod keys;
pub mod promote;
pub mod seed;
pub mod shop;

use anyhow::Context;
use std::path::PathBuf;
use sweetshop_client::{ApiClient, TokenFile};

/// Where the API lives and where the login session is kept.
pub struct ClientContext {
    pub api_url: String,
    pub token_file: TokenFile,
    pub json: bool,
}

impl ClientContext {
    pub fn new(api_url: String, session_file: Option<PathBuf>, json: bool) -> Self {
        Self {
            api_url,
            token_file: TokenFile::new(session_file.unwrap_or_else(default_session_path)),
            json,
        }
    }

    pub fn anonymous(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.api_url)?)
    }

    /// Client carrying the saved token.
    pub fn authenticated(&self) -> anyhow::Result<ApiClient> {
        let session = self
            .token_file
            .load()?
            .context("not logged in; run `sweetshop login <username>` first")?;
        if session.expires_at <= chrono::Utc::now() {
            anyhow::bail!(
                "session expired at {}; run `sweetshop login` again",
                session.expires_at
            );
        }
        Ok(self.anonymous()?.with_token(Some(session.token)))
    }
}

/// `$HOME/.sweetshop/session.json`, or `.sweetshop-session.json` in the
/// working directory when there is no home.
fn default_session_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".sweetshop").join("session.json"),
        None => PathBuf::from(".sweetshop-session.json"),
    }
}
