//! Accounts: password hashing and the initial admin.

pub mod bootstrap;
pub mod password;
