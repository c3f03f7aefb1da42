//! Round orchestration: lobby, turns, reactions, deadlines and the win.
//!
//! All mutation happens under one async mutex. Each operation copies what it
//! needs to broadcast while holding the lock, then resolves profiles and
//! talks to the broadcaster after releasing it.

pub mod broadcast;
pub mod interpreter;
mod lobby;
mod player_actions;
pub mod state;
mod watchdog;
mod win;

use std::sync::Arc;

use rand_chacha::ChaCha20Rng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use self::broadcast::{ErrorNotice, RoundBroadcaster};
pub use self::interpreter::{interpret, Notice};
pub use self::lobby::normalize_name;
pub use self::state::{ConnId, ConnectionInfo, Player, RoundState, RoundStatus, RoundView};
pub use self::watchdog::spawn_watchdog;
use self::win::Finish;
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::domain::{CardColour, CardId};
use crate::error::AppError;
use crate::protocol::RoundSnapshot;
use crate::repos::profiles::{ProfileStore, UserId};

/// A client request, already decoded from the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Join,
    ToggleReady,
    DrawCard,
    PlayCard {
        card_id: CardId,
        colour: Option<CardColour>,
    },
    UpdateName {
        name: String,
    },
}

struct Table {
    round: RoundState,
    rng: ChaCha20Rng,
}

/// What an operation hands to [`RoundService::publish`] once the lock is gone.
struct Outcome {
    notices: Vec<Notice>,
    connections: Option<Vec<ConnectionInfo>>,
    view: RoundView,
    finish: Option<Finish>,
}

impl Outcome {
    fn new(view: RoundView) -> Self {
        Self {
            notices: Vec::new(),
            connections: None,
            view,
            finish: None,
        }
    }

    fn with_notices(mut self, notices: Vec<Notice>) -> Self {
        self.notices = notices;
        self
    }

    fn with_connections(mut self, connections: Vec<ConnectionInfo>) -> Self {
        self.connections = Some(connections);
        self
    }

    fn with_finish(mut self, finish: Option<Finish>) -> Self {
        self.finish = finish;
        self
    }
}

pub struct RoundService {
    table: Mutex<Table>,
    config: GameConfig,
    profiles: Arc<dyn ProfileStore>,
    broadcaster: Arc<dyn RoundBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl RoundService {
    pub fn new(
        config: GameConfig,
        profiles: Arc<dyn ProfileStore>,
        broadcaster: Arc<dyn RoundBroadcaster>,
        clock: Arc<dyn Clock>,
        rng: ChaCha20Rng,
    ) -> Self {
        Self {
            table: Mutex::new(Table {
                round: RoundState::new(),
                rng,
            }),
            config,
            profiles,
            broadcaster,
            clock,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Runs one intent. A rejection goes to `conn` as an error notice,
    /// followed by a rebroadcast of the unchanged state.
    pub async fn handle(&self, conn: ConnId, intent: Intent) {
        let result = match intent {
            Intent::Join => self.join(conn).await,
            Intent::ToggleReady => self.toggle_ready(conn).await,
            Intent::DrawCard => self.draw_card(conn).await,
            Intent::PlayCard { card_id, colour } => self.play_card(conn, card_id, colour).await,
            Intent::UpdateName { name } => self.update_name(conn, &name).await,
        };

        if let Err(err) = result {
            debug!(%conn, code = %err.code(), detail = %err.detail(), "intent rejected");
            self.broadcaster.error(Some(conn), &ErrorNotice::from(&err));
            self.sync().await;
        }
    }

    /// Rebroadcasts the current state to everyone.
    pub async fn sync(&self) {
        let view = self.table.lock().await.round.view();
        let snapshot = self.resolve_snapshot(view).await;
        self.broadcaster.state(&snapshot);
    }

    /// Runs `f` against the round under the lock, without broadcasting.
    /// Meant for fixtures and diagnostics.
    pub async fn with_state<R>(&self, f: impl FnOnce(&mut RoundState) -> R) -> R {
        let mut table = self.table.lock().await;
        f(&mut table.round)
    }

    async fn resolve_snapshot(&self, view: RoundView) -> RoundSnapshot {
        let user_ids: Vec<UserId> = view.seats.iter().map(|s| s.user_id.clone()).collect();
        let profiles = match self.profiles.resolve(&user_ids).await {
            Ok(profiles) => profiles,
            Err(err) => {
                warn!(error = %err, "profile lookup failed; broadcasting user ids as names");
                Vec::new()
            }
        };
        RoundSnapshot::resolve(view, &profiles)
    }

    async fn publish(&self, outcome: Outcome) {
        for notice in &outcome.notices {
            self.broadcaster.error(
                notice.target,
                &ErrorNotice {
                    code: notice.code,
                    message: notice.message.clone(),
                },
            );
        }
        if let Some(connections) = &outcome.connections {
            self.broadcaster.connections(connections);
        }
        let snapshot = self.resolve_snapshot(outcome.view).await;
        self.broadcaster.state(&snapshot);

        if let Some(finish) = outcome.finish {
            self.announce_win(finish).await;
        }
    }
}
