//! Token creation and verification.

use crate::claims::SessionClaims;
use crate::error::BiscuitError;
use crate::keys::KeyPair;
use biscuit_auth::builder::AuthorizerBuilder;
use biscuit_auth::macros::fact;
use biscuit_auth::{Authorizer, Biscuit, PublicKey};
use chrono::{DateTime, Duration, Utc};
use sweetshop_core::Role;
use uuid::Uuid;

/// Mints session tokens.
pub struct TokenBuilder {
    keypair: KeyPair,
}

impl TokenBuilder {
    /// Create a new token builder with the given keypair.
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// Verifier matching this builder's key.
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.keypair.public_key())
    }

    /// Mint a token for `user_id` acting as `role`, valid for `ttl`.
    pub fn mint_session_token(
        &self,
        user_id: Uuid,
        role: Role,
        ttl: Duration,
    ) -> Result<(String, SessionClaims), BiscuitError> {
        let claims = SessionClaims::new(user_id, role, ttl);
        let token = self.mint(&claims)?;
        Ok((token, claims))
    }

    /// Mint a token carrying exactly `claims`.
    pub fn mint(&self, claims: &SessionClaims) -> Result<String, BiscuitError> {
        let failed = |e: biscuit_auth::error::Token| BiscuitError::TokenCreationFailed(e.to_string());

        let biscuit = Biscuit::builder()
            .fact(fact!("user({user})", user = claims.user_id.to_string()))
            .map_err(failed)?
            .fact(fact!("role({role})", role = claims.role.as_str().to_string()))
            .map_err(failed)?
            .fact(fact!("expiry({expiry})", expiry = claims.expires_at.timestamp()))
            .map_err(failed)?
            .fact(fact!("issued_at({issued})", issued = claims.issued_at.timestamp()))
            .map_err(failed)?
            .build(self.keypair.inner())
            .map_err(failed)?;

        biscuit
            .to_base64()
            .map_err(|e| BiscuitError::TokenCreationFailed(e.to_string()))
    }
}

/// Verifier for session tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    public_key: PublicKey,
}

impl TokenVerifier {
    /// Create a new token verifier with the given public key.
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Check the signature and expiry and extract the claims.
    ///
    /// Forged, truncated or foreign-key tokens fail with
    /// [`BiscuitError::TokenParseFailed`]; a valid token past its expiry
    /// fails with [`BiscuitError::TokenExpired`].
    pub fn verify(&self, token: &str) -> Result<SessionClaims, BiscuitError> {
        let biscuit = Biscuit::from_base64(token.trim(), self.public_key.clone())
            .map_err(|e| BiscuitError::TokenParseFailed(e.to_string()))?;

        let mut authorizer = AuthorizerBuilder::new()
            .code("allow if true;")
            .map_err(|e| BiscuitError::VerificationFailed(e.to_string()))?
            .build(&biscuit)
            .map_err(|e| BiscuitError::VerificationFailed(e.to_string()))?;

        authorizer
            .authorize()
            .map_err(|e| BiscuitError::VerificationFailed(e.to_string()))?;

        let user = first_string(&mut authorizer, "user")?;
        let role = first_string(&mut authorizer, "role")?;
        let expiry = first_i64(&mut authorizer, "expiry")?;
        let issued = first_i64(&mut authorizer, "issued_at")?;

        let user_id = Uuid::parse_str(&user).map_err(|e| BiscuitError::InvalidClaim {
            claim: "user".to_string(),
            reason: e.to_string(),
        })?;
        let role: Role = role.parse().map_err(|e: sweetshop_core::role::UnknownRole| {
            BiscuitError::InvalidClaim {
                claim: "role".to_string(),
                reason: e.to_string(),
            }
        })?;

        let claims = SessionClaims {
            user_id,
            role,
            issued_at: timestamp("issued_at", issued)?,
            expires_at: timestamp("expiry", expiry)?,
        };

        if claims.is_expired() {
            tracing::debug!(user_id = %claims.user_id, expires_at = %claims.expires_at, "rejecting expired token");
            return Err(BiscuitError::TokenExpired {
                expired_at: claims.expires_at.to_rfc3339(),
            });
        }

        Ok(claims)
    }
}

fn first_string(authorizer: &mut Authorizer, name: &str) -> Result<String, BiscuitError> {
    let rule = format!("data($x) <- {name}($x)");
    let rows: Vec<(String,)> = authorizer
        .query(rule.as_str())
        .map_err(|e| BiscuitError::VerificationFailed(e.to_string()))?;
    rows.into_iter()
        .next()
        .map(|(s,)| s)
        .ok_or_else(|| BiscuitError::MissingClaim {
            claim: name.to_string(),
        })
}

fn first_i64(authorizer: &mut Authorizer, name: &str) -> Result<i64, BiscuitError> {
    let rule = format!("data($x) <- {name}($x)");
    let rows: Vec<(i64,)> = authorizer
        .query(rule.as_str())
        .map_err(|e| BiscuitError::VerificationFailed(e.to_string()))?;
    rows.into_iter()
        .next()
        .map(|(v,)| v)
        .ok_or_else(|| BiscuitError::MissingClaim {
            claim: name.to_string(),
        })
}

fn timestamp(claim: &str, secs: i64) -> Result<DateTime<Utc>, BiscuitError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| BiscuitError::InvalidClaim {
        claim: claim.to_string(),
        reason: format!("{secs} is not a valid unix timestamp"),
    })
}
