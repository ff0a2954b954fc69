use std::sync::Arc;

use crate::config::{GameConfig, ServerConfig};
use crate::session::SessionStore;

/// Shared across all workers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(server: ServerConfig, game: GameConfig) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(game)),
            server,
        }
    }

    /// Default server settings with the given game config.
    pub fn for_tests(game: GameConfig) -> Self {
        Self::new(ServerConfig::default(), game)
    }
}
