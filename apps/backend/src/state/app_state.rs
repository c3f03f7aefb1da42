use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::GameConfig;
use crate::services::round::RoundService;
use crate::ws::hub::WsRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Profile database (absent when running on the in-memory store)
    db: Option<DatabaseConnection>,
    config: GameConfig,
    round: Arc<RoundService>,
    registry: Arc<WsRegistry>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        config: GameConfig,
        round: Arc<RoundService>,
        registry: Arc<WsRegistry>,
    ) -> Self {
        Self {
            db,
            config,
            round,
            registry,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> Arc<RoundService> {
        self.round.clone()
    }

    pub fn registry(&self) -> Arc<WsRegistry> {
        self.registry.clone()
    }
}
