use tracing::{debug, info};

use super::{win, Outcome, RoundService};
use crate::domain::{CardColour, CardId};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::round::interpreter::interpret;
use crate::services::round::state::{ConnId, RoundState, RoundStatus};

/// Seat of the connection's player, provided it holds the turn.
fn acting_position(round: &RoundState, conn: ConnId) -> Result<usize, DomainError> {
    if round.status != RoundStatus::Playing {
        return Err(DomainError::game_not_started());
    }
    let info = round
        .connection(conn)
        .ok_or_else(DomainError::unknown_connection)?;
    let index = round
        .player_index(&info.user_id)
        .ok_or_else(DomainError::not_joined)?;
    let position = round.players[index].position;
    if position != round.current_position {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            "Not your turn.",
        ));
    }
    if round.pile.is_none() {
        return Err(DomainError::deck_not_initialized());
    }
    Ok(position)
}

impl RoundService {
    pub async fn draw_card(&self, conn: ConnId) -> Result<(), AppError> {
        let outcome = {
            let mut table = self.table.lock().await;
            let round = &mut table.round;
            let position = acting_position(round, conn)?;
            let pile = round
                .pile
                .as_mut()
                .ok_or_else(DomainError::deck_not_initialized)?;
            let reactions = pile.draw(position);
            debug!(position, pile = pile.pile_len(), "card drawn");

            let notices = interpret(
                round,
                reactions,
                Some(conn),
                self.clock.now(),
                self.config.turn_timeout,
            );
            Outcome::new(round.view()).with_notices(notices)
        };
        self.publish(outcome).await;
        Ok(())
    }

    pub async fn play_card(
        &self,
        conn: ConnId,
        card_id: CardId,
        colour: Option<CardColour>,
    ) -> Result<(), AppError> {
        let outcome = {
            let mut table = self.table.lock().await;
            let round = &mut table.round;
            let position = acting_position(round, conn)?;
            let pile = round
                .pile
                .as_mut()
                .ok_or_else(DomainError::deck_not_initialized)?;
            let reactions = pile.play(position, card_id, colour)?;
            info!(position, %card_id, ?colour, "card played");

            let notices = interpret(
                round,
                reactions,
                Some(conn),
                self.clock.now(),
                self.config.turn_timeout,
            );
            let view = round.view();
            // a win is only possible right after a play
            let finish = win::settle(round);
            Outcome::new(view)
                .with_notices(notices)
                .with_finish(finish)
        };
        self.publish(outcome).await;
        Ok(())
    }
}
