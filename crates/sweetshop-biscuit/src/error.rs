//! Error types for the Biscuit crate.

use thiserror::Error;

/// Errors that can occur during Biscuit token operations.
#[derive(Debug, Error)]
pub enum BiscuitError {
    /// Failed to generate keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// Failed to parse private key.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// Failed to create token.
    #[error("failed to create token: {0}")]
    TokenCreationFailed(String),

    /// Failed to parse token, including signature mismatch.
    #[error("failed to parse token: {0}")]
    TokenParseFailed(String),

    /// Token verification failed.
    #[error("token verification failed: {0}")]
    VerificationFailed(String),

    /// Token has expired.
    #[error("token has expired at {expired_at}")]
    TokenExpired { expired_at: String },

    /// Token is missing required claim.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: String },

    /// A claim is present but unusable.
    #[error("token claim {claim} is invalid: {reason}")]
    InvalidClaim { claim: String, reason: String },

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BiscuitError {
    /// True when the token was well-formed and signed but is past its expiry.
    pub fn is_expired(&self) -> bool {
        matches!(self, BiscuitError::TokenExpired { .. })
    }
}
