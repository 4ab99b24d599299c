//! # sweetshop-biscuit
//!
//! Session tokens for the Sweet Shop API.
//!
//! This crate provides functionality for:
//! - Generating Ed25519 keypairs for token signing
//! - Minting session tokens that carry a user id, a role and an expiry
//! - Verifying tokens and extracting their claims
//!
//! Tokens are stateless: the server keeps no session table, and expiry is the
//! only way a token stops working.
//!
//! | Fact | Meaning |
//! |------|---------|
//! | `user("<uuid>")` | account the token was issued to |
//! | `role("admin" \| "user")` | role at login time |
//! | `expiry(<unix seconds>)` | last second the token is valid |
//! | `issued_at(<unix seconds>)` | mint time |

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use biscuit_auth::PublicKey;
pub use claims::SessionClaims;
pub use error::BiscuitError;
pub use keys::KeyPair;
pub use token::{TokenBuilder, TokenVerifier};
