//! Claims carried by a session token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sweetshop_core::Role;
use uuid::Uuid;

/// Identity proven by a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account the token was issued to.
    pub user_id: Uuid,

    /// Role at the time of login.
    pub role: Role,

    /// When the token was minted.
    pub issued_at: DateTime<Utc>,

    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Claims for a token minted now and valid for `ttl`.
    pub fn new(user_id: Uuid, role: Role, ttl: Duration) -> Self {
        // Biscuit facts hold whole seconds.
        let issued_at = truncate_to_seconds(Utc::now());
        Self {
            user_id,
            role,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

fn truncate_to_seconds(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}
