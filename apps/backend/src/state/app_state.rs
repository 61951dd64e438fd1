use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::services::{Arena, ArenaSettings};
use crate::ws::WsRegistry;

/// Shared handles for every worker.
#[derive(Clone)]
pub struct AppState {
    pub arena: Arc<Arena>,
    /// Live sockets; also the arena's outbox.
    pub connections: Arc<WsRegistry>,
    pub config: ServerConfig,
}

impl AppState {
    /// Build from configuration; fails if the catalog cannot be loaded.
    pub fn build(config: ServerConfig) -> Result<Self, AppError> {
        let catalog = Arc::new(config.load_catalog()?);
        let connections = Arc::new(WsRegistry::new());
        let arena = Arena::new(
            catalog,
            connections.clone(),
            ArenaSettings {
                round_timeout: config.round_timeout,
                rng_seed: config.rng_seed,
            },
        );
        Ok(Self {
            arena,
            connections,
            config,
        })
    }
}
