#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;
pub mod ws;


pub use config::ServerConfig;
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use middleware::{cors_middleware, RequestTrace, StructuredLogger};
pub use services::{Arena, ArenaSettings};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
