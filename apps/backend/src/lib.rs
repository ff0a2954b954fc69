#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod game;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod state;
pub mod ws;

pub use config::{GameConfig, ServerConfig};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use game::Game;
pub use middleware::cors::cors_middleware;
pub use middleware::structured_logger::StructuredLogger;
pub use session::{SessionActor, SessionHandle, SessionStore};
pub use state::app_state::AppState;

// Unit tests share the integration tests' logging bootstrap.
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
