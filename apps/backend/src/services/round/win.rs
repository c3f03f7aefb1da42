use tracing::{error, info, warn};

use super::RoundService;
use crate::protocol::PodiumEntry;
use crate::repos::profiles::UserId;
use crate::services::round::state::{RoundState, RoundView};

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Standing {
    user_id: UserId,
    position: usize,
    hand_size: usize,
}

/// A finished round: final standings plus the reset lobby to broadcast.
#[derive(Debug)]
pub(super) struct Finish {
    standings: Vec<Standing>,
    after: RoundView,
}

/// If any hand is empty, ranks the seats by cards left (ties keep seat
/// order) and resets the round to an empty lobby.
pub(super) fn settle(round: &mut RoundState) -> Option<Finish> {
    let pile = round.pile.as_ref()?;
    let emptied = pile.hands().iter().filter(|h| h.is_empty()).count();
    if emptied == 0 {
        return None;
    }
    // plays remove one card at a time and every play is checked
    debug_assert_eq!(emptied, 1, "more than one hand emptied before settling");

    let mut standings: Vec<Standing> = round
        .players
        .iter()
        .map(|p| Standing {
            user_id: p.user_id.clone(),
            position: p.position,
            hand_size: pile.hand(p.position).len(),
        })
        .collect();
    standings.sort_by_key(|s| s.hand_size);

    round.reset();
    Some(Finish {
        standings,
        after: round.view(),
    })
}

impl RoundService {
    /// Records the leader's win, then broadcasts the podium and the reset lobby.
    pub(super) async fn announce_win(&self, finish: Finish) {
        let user_ids: Vec<UserId> = finish
            .standings
            .iter()
            .map(|s| s.user_id.clone())
            .collect();
        let profiles = self.profiles.resolve(&user_ids).await.unwrap_or_else(|err| {
            warn!(error = %err, "profile lookup failed while building the podium");
            Vec::new()
        });

        let mut podium: Vec<PodiumEntry> = finish
            .standings
            .into_iter()
            .enumerate()
            .map(|(index, standing)| {
                let profile = profiles.iter().find(|p| p.user_id == standing.user_id);
                PodiumEntry {
                    rank: index + 1,
                    name: profile.map_or_else(|| standing.user_id.clone(), |p| p.name.clone()),
                    wins: profile.map_or(0, |p| p.wins),
                    position: standing.position,
                    hand_size: standing.hand_size,
                    user_id: standing.user_id,
                }
            })
            .collect();

        if let Some(leader) = podium.first_mut() {
            match self.profiles.increment_wins(&leader.user_id).await {
                Ok(profile) => leader.wins = profile.wins,
                Err(err) => {
                    error!(error = %err, user_id = %leader.user_id, "failed to record win");
                    leader.wins += 1;
                }
            }
            info!(winner = %leader.user_id, wins = leader.wins, "round won");
        }

        self.broadcaster.podium(&podium);
        let snapshot = self.resolve_snapshot(finish.after).await;
        self.broadcaster.state(&snapshot);
    }
}
