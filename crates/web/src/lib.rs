//! Complex Forms API
//!
//! Mock backend for the complex forms harness: serves dropdown metadata and
//! hierarchy trees, authenticates users with JWTs and records submissions.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod payload;
pub mod rate_limit;
pub mod routes;
pub mod server;

pub use config::{RateLimitConfig, ServerConfig};
pub use error::ApiError;
pub use server::{AppState, WebServer};
