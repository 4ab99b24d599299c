//! # sweetshop-core
//!
//! Domain and wire types shared by every Sweet Shop crate.
//!
//! - [`Sweet`], [`NewSweet`], [`SweetPatch`]: inventory items and their mutations
//! - [`Price`]: exact two-decimal money amount
//! - [`Role`], [`User`]: accounts and the closed set of roles
//! - [`api_types`]: request/response bodies of the REST surface

pub mod api_types;
pub mod error;
pub mod price;
pub mod role;
pub mod sweet;
pub mod user;

pub use error::ValidationError;
pub use price::Price;
pub use role::Role;
pub use sweet::{NewSweet, Sweet, SweetId, SweetPatch};
pub use user::User;
