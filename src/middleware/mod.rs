//! Middleware for observability.
//!
//! Request logging with latency tracking and request ids.

pub mod logging;

pub use logging::request_logging;
