use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::adapters::profiles_sea::SeaProfileStore;
use crate::clock::{Clock, SystemClock};
use crate::config::db::DbProfile;
use crate::config::GameConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::profiles::{InMemoryProfileStore, ProfileStore};
use crate::services::round::{RoundBroadcaster, RoundService};
use crate::state::app_state::AppState;
use crate::ws::hub::WsRegistry;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: GameConfig,
    db_profile: Option<DbProfile>,
    clock: Arc<dyn Clock>,
    rng_seed: Option<u64>,
    broadcaster: Option<Arc<dyn RoundBroadcaster>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            db_profile: None,
            clock: Arc::new(SystemClock),
            rng_seed: None,
            broadcaster: None,
        }
    }

    /// Persist profiles in SQLite. Without it profiles live in memory.
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Deterministic shuffles, for tests.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Replace the websocket hub as the round's broadcaster. The hub is
    /// still built and stored so `/ws` keeps working.
    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn RoundBroadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        self.config.validate()?;

        let (db, profiles) = match &self.db_profile {
            Some(profile) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(profile).await?;
                let store: Arc<dyn ProfileStore> = Arc::new(SeaProfileStore::new(conn.clone()));
                (Some(conn), store)
            }
            None => {
                let store: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
                (None, store)
            }
        };

        let rng = match self.rng_seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_os_rng(),
        };

        let registry = Arc::new(WsRegistry::new(self.config.hand_visibility));
        let broadcaster: Arc<dyn RoundBroadcaster> = match self.broadcaster {
            Some(broadcaster) => broadcaster,
            None => registry.clone(),
        };

        let round = Arc::new(RoundService::new(
            self.config.clone(),
            profiles,
            broadcaster,
            self.clock,
            rng,
        ));

        Ok(AppState::new(db, self.config, round, registry))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
