use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use super::{Outcome, RoundService};
use crate::domain::Reaction;
use crate::services::round::interpreter::interpret;
use crate::services::round::state::RoundStatus;

impl RoundService {
    /// One watchdog pass: if the player holding the turn is past their
    /// deadline, they draw and the turn moves on. Returns whether it fired.
    pub async fn tick(&self) -> bool {
        let outcome = {
            let mut table = self.table.lock().await;
            let round = &mut table.round;
            if round.status != RoundStatus::Playing {
                return false;
            }
            let now = self.clock.now();
            let Some(deadline) = round.current_player().and_then(|p| p.deadline) else {
                return false;
            };
            if deadline >= now {
                return false;
            }

            info!(
                position = round.current_position,
                "turn deadline elapsed; forcing a draw"
            );
            let notices = interpret(
                round,
                vec![Reaction::ForceDraw, Reaction::AdvanceTurn],
                None,
                now,
                self.config.turn_timeout,
            );
            Outcome::new(round.view()).with_notices(notices)
        };
        self.publish(outcome).await;
        true
    }
}

/// Ticks the service on its configured interval until the task is aborted.
pub fn spawn_watchdog(service: Arc<RoundService>) -> JoinHandle<()> {
    let period = service.config().tick_interval;
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            service.tick().await;
        }
    })
}
