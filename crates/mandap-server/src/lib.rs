//! # mandap-server
//!
//! HTTP server binary for the Mandap marketplace backend: configuration
//! loading, tracing setup, the Postgres pool, and the axum application.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod state;

pub use config::{AppConfig, DatabaseConfig, Environment, LoggingConfig, ServerConfig};
pub use error::{ApiError, ApiJson};
pub use observability::init_tracing;
pub use server::{MandapServer, ServerBuilder, build_app};
pub use state::AppState;
