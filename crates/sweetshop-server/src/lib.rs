//! # sweetshop-server
//!
//! REST backend of the Sweet Shop: axum handlers over the SQLite store,
//! guarded by Biscuit bearer tokens and an admin role gate.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{AppConfig, load_config};
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
