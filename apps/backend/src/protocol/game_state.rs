use std::collections::HashMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::config::HandVisibility;
use crate::domain::{Card, Direction};
use crate::repos::profiles::Profile;
use crate::services::round::state::{RoundStatus, RoundView};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub user_id: String,
    pub name: String,
    pub wins: u32,
    pub position: usize,
    pub ready: bool,
    /// Unix milliseconds.
    pub deadline: Option<i64>,
    pub hand: Vec<Card>,
    pub hand_size: usize,
}

/// Full round state as broadcast to clients.
///
/// `revision` grows with every snapshot; clients drop anything older than
/// what they already hold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub revision: u64,
    pub status: RoundStatus,
    pub active_card: Option<Card>,
    pub pile_size: usize,
    pub current_position: usize,
    pub direction: Direction,
    pub players: Vec<PlayerView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PodiumEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub wins: u32,
    pub position: usize,
    pub hand_size: usize,
}

pub fn unix_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

impl RoundSnapshot {
    /// Joins a view with profiles. Seats without a profile fall back to the
    /// user id as name and zero wins.
    pub fn resolve(view: RoundView, profiles: &[Profile]) -> Self {
        let by_id: HashMap<&str, &Profile> =
            profiles.iter().map(|p| (p.user_id.as_str(), p)).collect();

        let players = view
            .seats
            .into_iter()
            .map(|seat| {
                let profile = by_id.get(seat.user_id.as_str());
                PlayerView {
                    name: profile.map_or_else(|| seat.user_id.clone(), |p| p.name.clone()),
                    wins: profile.map_or(0, |p| p.wins),
                    position: seat.position,
                    ready: seat.ready,
                    deadline: seat.deadline.map(unix_millis),
                    hand_size: seat.hand.len(),
                    hand: seat.hand,
                    user_id: seat.user_id,
                }
            })
            .collect();

        Self {
            revision: view.revision,
            status: view.status,
            active_card: view.active_card,
            pile_size: view.pile_size,
            current_position: view.current_position,
            direction: view.direction,
            players,
        }
    }

    /// The snapshot as `viewer` may see it. With [`HandVisibility::Own`]
    /// every other hand is emptied; `hand_size` is kept.
    pub fn for_viewer(&self, viewer: &str, visibility: HandVisibility) -> Self {
        let mut snapshot = self.clone();
        if visibility == HandVisibility::Own {
            for player in &mut snapshot.players {
                if player.user_id != viewer {
                    player.hand.clear();
                }
            }
        }
        snapshot
    }
}
