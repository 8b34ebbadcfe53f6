//! HTTP API: configuration, version negotiation, routing and
//! request/response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod versioning;

pub use app::{build_app, build_router};
pub use config::{ApiConfig, ConfigError};
