//! Owned round state: roster, turn, pile and the live connections.

use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{Card, Direction, PileEngine};
use crate::repos::profiles::UserId;

/// Placeholder seat for a new player until the roster is recompacted.
pub const UNSEATED: usize = 999;

/// Transport-level connection handle.
pub type ConnId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub user_id: UserId,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    #[default]
    Waiting,
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub user_id: UserId,
    pub position: usize,
    pub ready: bool,
    /// Only the player holding the turn has one, and only while playing.
    pub deadline: Option<OffsetDateTime>,
}

impl Player {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            position: UNSEATED,
            ready: false,
            deadline: None,
        }
    }
}

/// Unresolved copy of one seat, taken under the round lock.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatView {
    pub user_id: UserId,
    pub position: usize,
    pub ready: bool,
    pub deadline: Option<OffsetDateTime>,
    pub hand: Vec<Card>,
}

/// Everything a state broadcast needs, minus profile data.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundView {
    pub revision: u64,
    pub status: RoundStatus,
    pub active_card: Option<Card>,
    pub pile_size: usize,
    pub current_position: usize,
    pub direction: Direction,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Default)]
pub struct RoundState {
    pub status: RoundStatus,
    pub current_position: usize,
    pub direction: Direction,
    /// Kept sorted by position, positions contiguous from 0.
    pub players: Vec<Player>,
    pub pile: Option<PileEngine>,
    connections: Vec<(ConnId, ConnectionInfo)>,
    revision: u64,
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&mut self, conn: ConnId, info: ConnectionInfo) {
        self.connections.retain(|(id, _)| *id != conn);
        self.connections.push((conn, info));
    }

    pub fn remove_connection(&mut self, conn: ConnId) -> Option<ConnectionInfo> {
        let index = self.connections.iter().position(|(id, _)| *id == conn)?;
        Some(self.connections.remove(index).1)
    }

    pub fn connection(&self, conn: ConnId) -> Option<&ConnectionInfo> {
        self.connections
            .iter()
            .find(|(id, _)| *id == conn)
            .map(|(_, info)| info)
    }

    pub fn connections(&self) -> Vec<ConnectionInfo> {
        self.connections.iter().map(|(_, info)| info.clone()).collect()
    }

    pub fn player_index(&self, user_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.user_id == user_id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.position == self.current_position)
    }

    /// Stable sort by position, then renumber 0..N-1.
    pub fn reorganize(&mut self) {
        self.players.sort_by_key(|p| p.position);
        for (index, player) in self.players.iter_mut().enumerate() {
            player.position = index;
        }
    }

    /// Drops players with no live connection. Returns how many were removed.
    pub fn prune_disconnected(&mut self) -> usize {
        let before = self.players.len();
        let connections = &self.connections;
        self.players
            .retain(|p| connections.iter().any(|(_, c)| c.user_id == p.user_id));
        let removed = before - self.players.len();
        if removed > 0 {
            self.reorganize();
        }
        removed
    }

    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.ready)
    }

    /// Gives the current player a fresh deadline and clears everyone else's.
    pub fn refresh_deadlines(&mut self, now: OffsetDateTime, timeout: Duration) {
        let current = self.current_position;
        for player in &mut self.players {
            player.deadline = (player.position == current).then(|| now + timeout);
        }
    }

    pub fn start(&mut self, pile: PileEngine, now: OffsetDateTime, timeout: Duration) {
        self.status = RoundStatus::Playing;
        self.current_position = 0;
        self.direction = Direction::Forward;
        self.pile = Some(pile);
        self.refresh_deadlines(now, timeout);
    }

    /// Back to an empty lobby. Connections survive.
    pub fn reset(&mut self) {
        self.status = RoundStatus::Waiting;
        self.current_position = 0;
        self.direction = Direction::Forward;
        self.players.clear();
        self.pile = None;
    }

    /// Copy the broadcastable state and stamp it with the next revision.
    pub fn view(&mut self) -> RoundView {
        self.revision += 1;
        let pile = self.pile.as_ref();
        RoundView {
            revision: self.revision,
            status: self.status,
            active_card: pile.and_then(|p| p.active_card().cloned()),
            pile_size: pile.map_or(0, PileEngine::pile_len),
            current_position: self.current_position,
            direction: self.direction,
            seats: self
                .players
                .iter()
                .map(|p| SeatView {
                    user_id: p.user_id.clone(),
                    position: p.position,
                    ready: p.ready,
                    deadline: p.deadline,
                    hand: pile.map(|e| e.hand(p.position).to_vec()).unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(user: &str) -> ConnectionInfo {
        ConnectionInfo {
            user_id: user.to_string(),
            session_id: format!("{user}-session"),
        }
    }

    #[test]
    fn reorganize_is_stable_and_contiguous() {
        let mut round = RoundState::new();
        for (user, position) in [("a", 3), ("b", 999), ("c", 0), ("d", 999)] {
            let mut player = Player::new(user.to_string());
            player.position = position;
            round.players.push(player);
        }
        round.reorganize();
        let order: Vec<_> = round
            .players
            .iter()
            .map(|p| (p.user_id.as_str(), p.position))
            .collect();
        assert_eq!(order, vec![("c", 0), ("a", 1), ("b", 2), ("d", 3)]);
    }

    #[test]
    fn prune_keeps_users_with_any_live_connection() {
        let mut round = RoundState::new();
        let (c1, c2, c3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        round.add_connection(c1, info("a"));
        round.add_connection(c2, info("a"));
        round.add_connection(c3, info("b"));
        for user in ["a", "b"] {
            round.players.push(Player::new(user.to_string()));
        }
        round.reorganize();

        round.remove_connection(c1);
        assert_eq!(round.prune_disconnected(), 0);

        round.remove_connection(c3);
        assert_eq!(round.prune_disconnected(), 1);
        assert_eq!(round.players.len(), 1);
        assert_eq!(round.players[0].user_id, "a");
        assert_eq!(round.players[0].position, 0);
    }

    #[test]
    fn refresh_deadlines_leaves_only_the_current_player() {
        let mut round = RoundState::new();
        for user in ["a", "b", "c"] {
            let mut player = Player::new(user.to_string());
            player.deadline = Some(OffsetDateTime::UNIX_EPOCH);
            round.players.push(player);
        }
        round.reorganize();
        round.current_position = 1;
        let now = OffsetDateTime::UNIX_EPOCH + Duration::from_secs(100);
        round.refresh_deadlines(now, Duration::from_secs(30));

        assert_eq!(round.players[0].deadline, None);
        assert_eq!(
            round.players[1].deadline,
            Some(now + Duration::from_secs(30))
        );
        assert_eq!(round.players[2].deadline, None);
    }

    #[test]
    fn views_carry_increasing_revisions() {
        let mut round = RoundState::new();
        let first = round.view();
        let second = round.view();
        assert!(second.revision > first.revision);
        assert_eq!(first.pile_size, 0);
        assert!(first.active_card.is_none());
    }
}
