//! Auth Demo Backend Library
//!
//! Mock JWT-authentication API and avatar upload endpoint. Exposes the
//! modules for use by the server binary and the integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;

pub use api::{build_router, AppState};
pub use config::Config;
