//! # sweetshop-client
//!
//! Client side of the Sweet Shop REST API.
//!
//! - [`ApiClient`]: typed HTTP client; implements [`SweetApi`]
//! - [`SweetCatalog`]: local list of sweets with filters and optimistic
//!   purchase updates, reconciled by the next full fetch
//! - [`Debouncer`]: latest-value-wins delay for search input
//! - [`TokenFile`]: the saved login session

pub mod api;
pub mod catalog;
pub mod debounce;
pub mod error;
pub mod session;

pub use api::{ApiClient, SweetApi};
pub use catalog::{ALL_CATEGORIES, Filters, SweetCatalog};
pub use debounce::{Debouncer, debounce};
pub use error::ClientError;
pub use session::TokenFile;
