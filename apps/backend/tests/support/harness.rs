// Round service fixtures: a recording broadcaster, a manual clock and a seeded rng

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use shed_backend::domain::{Card, PileEngine};
use shed_backend::repos::profiles::{InMemoryProfileStore, ProfileStore};
use shed_backend::services::round::{ConnId, ConnectionInfo, RoundStatus};
use shed_backend::{GameConfig, Intent, ManualClock, RoundService};
use uuid::Uuid;

use super::recording::RecordingBroadcaster;

pub struct Harness {
    pub service: Arc<RoundService>,
    pub broadcaster: Arc<RecordingBroadcaster>,
    pub clock: Arc<ManualClock>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::build(config, Arc::new(InMemoryProfileStore::new()))
    }

    pub fn with_profiles(profiles: Arc<dyn ProfileStore>) -> Self {
        Self::build(GameConfig::default(), profiles)
    }

    fn build(config: GameConfig, profiles: Arc<dyn ProfileStore>) -> Self {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let clock = Arc::new(ManualClock::default());
        let service = Arc::new(RoundService::new(
            config,
            profiles.clone(),
            broadcaster.clone(),
            clock.clone(),
            ChaCha20Rng::seed_from_u64(42),
        ));
        Self {
            service,
            broadcaster,
            clock,
            profiles,
        }
    }

    /// Opens a connection for `user_id` and returns its id.
    pub async fn connect(&self, user_id: &str) -> ConnId {
        let conn = Uuid::new_v4();
        self.service
            .connect(
                conn,
                ConnectionInfo {
                    user_id: user_id.to_string(),
                    session_id: format!("{user_id}-session"),
                },
            )
            .await;
        conn
    }

    /// Connects and joins every user, in order.
    pub async fn seat(&self, users: &[&str]) -> Vec<ConnId> {
        let mut conns = Vec::with_capacity(users.len());
        for user in users {
            let conn = self.connect(user).await;
            self.service.join(conn).await.expect("join");
            conns.push(conn);
        }
        conns
    }

    /// Seats everyone and readies them so the round starts.
    pub async fn start(&self, users: &[&str]) -> Vec<ConnId> {
        let conns = self.seat(users).await;
        for conn in &conns {
            self.service.toggle_ready(*conn).await.expect("toggle ready");
        }
        let status = self.service.with_state(|r| r.status).await;
        assert_eq!(status, RoundStatus::Playing, "round should have started");
        conns
    }

    /// Replaces the dealt cards with a fixed layout. `pile` is head-first;
    /// its last card is the active card.
    pub async fn rig(&self, pile: Vec<Card>, hands: Vec<Vec<Card>>) {
        self.service
            .with_state(move |round| round.pile = Some(PileEngine::from_parts(pile, hands)))
            .await;
    }

    pub async fn hand_sizes(&self) -> Vec<usize> {
        self.service
            .with_state(|round| {
                round
                    .pile
                    .as_ref()
                    .map(|p| p.hands().iter().map(Vec::len).collect())
                    .unwrap_or_default()
            })
            .await
    }

    pub async fn current_position(&self) -> usize {
        self.service.with_state(|r| r.current_position).await
    }

    pub async fn play(&self, conn: ConnId, card: &Card) {
        self.service
            .handle(
                conn,
                Intent::PlayCard {
                    card_id: card.id,
                    colour: None,
                },
            )
            .await;
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Card shorthands for rigged layouts.
pub mod cards {
    use shed_backend::domain::{Card, CardAbility, CardColour};

    pub fn red(n: u8) -> Card {
        Card::number(CardColour::Red, n)
    }

    pub fn blue(n: u8) -> Card {
        Card::number(CardColour::Blue, n)
    }

    pub fn green(n: u8) -> Card {
        Card::number(CardColour::Green, n)
    }

    pub fn red_ability(ability: CardAbility) -> Card {
        Card::ability(CardColour::Red, ability)
    }

    pub fn wild(ability: CardAbility) -> Card {
        Card::wild(ability)
    }

    /// `n` filler cards nothing in these tests will try to play.
    pub fn filler(n: usize) -> Vec<Card> {
        (0..n).map(|_| Card::number(CardColour::Yellow, 9)).collect()
    }
}
