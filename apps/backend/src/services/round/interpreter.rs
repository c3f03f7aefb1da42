//! Reaction interpreter.
//!
//! Reactions are consumed from an explicit queue. A forced draw deals to the
//! player holding the turn, then splices the draw's own reactions plus a
//! `reverse, advance, reverse` bracket in front of whatever is still pending.
//! The draw advances to the neighbour and the bracket walks back, so the
//! turn stays put while that player's deadline is refreshed.

use std::collections::VecDeque;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{trace, warn};

use crate::domain::{next_position, Reaction};
use crate::errors::{DomainError, ErrorCode};
use crate::services::round::state::{ConnId, RoundState};

/// Error produced while interpreting, addressed to one connection or to all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: Option<ConnId>,
    pub code: ErrorCode,
    pub message: String,
}

pub fn interpret(
    round: &mut RoundState,
    reactions: Vec<Reaction>,
    origin: Option<ConnId>,
    now: OffsetDateTime,
    turn_timeout: Duration,
) -> Vec<Notice> {
    let mut queue: VecDeque<Reaction> = reactions.into();
    let mut notices = Vec::new();

    while let Some(reaction) = queue.pop_front() {
        trace!(?reaction, position = round.current_position, "interpret");
        match reaction {
            Reaction::AdvanceTurn => {
                let roster = round.players.len();
                if roster == 0 {
                    continue;
                }
                round.current_position =
                    next_position(round.current_position, round.direction, roster);
                round.refresh_deadlines(now, turn_timeout);
            }
            Reaction::ReverseDirection => {
                round.direction = round.direction.reversed();
            }
            Reaction::ForceDraw => {
                let Some(pile) = round.pile.as_mut() else {
                    let err = DomainError::deck_not_initialized();
                    warn!(error = %err, "forced draw without a pile");
                    notices.push(Notice {
                        target: origin,
                        code: err.code(),
                        message: err.detail().to_string(),
                    });
                    continue;
                };
                let mut follow_up = pile.draw(round.current_position);
                follow_up.extend([
                    Reaction::ReverseDirection,
                    Reaction::AdvanceTurn,
                    Reaction::ReverseDirection,
                ]);
                for next in follow_up.into_iter().rev() {
                    queue.push_front(next);
                }
            }
            Reaction::Error(message) => {
                notices.push(Notice {
                    target: origin,
                    code: ErrorCode::Internal,
                    message,
                });
            }
        }
    }

    notices
}
