//! The saved login session, kept in a small JSON file between runs.

use crate::error::ClientError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use sweetshop_core::api_types::LoginResponse;

#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nobody is logged in.
    pub fn load(&self) -> Result<Option<LoginResponse>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| self.session_error(e.to_string()))
    }

    pub fn save(&self, session: &LoginResponse) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json =
            serde_json::to_string_pretty(session).map_err(|e| self.session_error(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the file. Returns whether a session existed.
    pub fn clear(&self) -> Result<bool, ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn session_error(&self, reason: String) -> ClientError {
        ClientError::Session {
            path: self.path.display().to_string(),
            reason,
        }
    }
}
