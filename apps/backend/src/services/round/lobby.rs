use tracing::info;
use unicode_normalization::UnicodeNormalization;

use super::{Outcome, RoundService, Table};
use crate::domain::PileEngine;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::services::round::state::{ConnId, ConnectionInfo, Player, RoundStatus};

/// NFC-normalised, trimmed display name, or `InvalidName`.
pub fn normalize_name(raw: &str, max_len: usize) -> Result<String, DomainError> {
    let normalized: String = raw.nfc().collect();
    let name = normalized.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            "Name cannot be empty.",
        ));
    }
    if name.chars().count() > max_len {
        return Err(DomainError::validation(
            ValidationKind::InvalidName,
            format!("Name must be at most {max_len} characters."),
        ));
    }
    Ok(name.to_string())
}

impl RoundService {
    /// Registers a transport connection and rebroadcasts.
    pub async fn connect(&self, conn: ConnId, info: ConnectionInfo) {
        let outcome = {
            let mut table = self.table.lock().await;
            info!(%conn, user_id = %info.user_id, session_id = %info.session_id, "connection registered");
            table.round.add_connection(conn, info);
            let connections = table.round.connections();
            Outcome::new(table.round.view()).with_connections(connections)
        };
        self.publish(outcome).await;
    }

    /// Forgets a connection. While waiting, players left without any
    /// connection are dropped from the roster.
    pub async fn disconnect(&self, conn: ConnId) {
        let outcome = {
            let mut table = self.table.lock().await;
            let round = &mut table.round;
            if let Some(info) = round.remove_connection(conn) {
                info!(%conn, user_id = %info.user_id, "connection dropped");
            }
            if round.status == RoundStatus::Waiting {
                let removed = round.prune_disconnected();
                if removed > 0 {
                    info!(removed, "pruned offline players from the lobby");
                }
            }
            let connections = round.connections();
            Outcome::new(round.view()).with_connections(connections)
        };
        self.publish(outcome).await;
    }

    pub async fn join(&self, conn: ConnId) -> Result<(), AppError> {
        let outcome = {
            let mut table = self.table.lock().await;
            let round = &mut table.round;
            let user_id = round
                .connection(conn)
                .ok_or_else(DomainError::unknown_connection)?
                .user_id
                .clone();
            if round.player_index(&user_id).is_some() {
                return Err(
                    DomainError::conflict(ConflictKind::AlreadyJoined, "Player already joined.")
                        .into(),
                );
            }
            if round.status != RoundStatus::Waiting {
                return Err(DomainError::game_in_progress().into());
            }
            if round.players.len() >= self.config.max_players {
                return Err(DomainError::conflict(ConflictKind::GameFull, "Game is full.").into());
            }

            round.players.push(Player::new(user_id.clone()));
            round.reorganize();
            info!(%user_id, players = round.players.len(), "player joined");
            Outcome::new(round.view())
        };
        self.publish(outcome).await;
        Ok(())
    }

    /// Flips the ready flag; starts the round once everyone is ready and
    /// the minimum is met.
    pub async fn toggle_ready(&self, conn: ConnId) -> Result<(), AppError> {
        let outcome = {
            let mut guard = self.table.lock().await;
            let Table { round, rng } = &mut *guard;
            if round.status != RoundStatus::Waiting {
                return Err(DomainError::game_in_progress().into());
            }
            let user_id = round
                .connection(conn)
                .ok_or_else(DomainError::unknown_connection)?
                .user_id
                .clone();
            let index = round
                .player_index(&user_id)
                .ok_or_else(DomainError::not_joined)?;

            let player = &mut round.players[index];
            player.ready = !player.ready;
            info!(%user_id, ready = player.ready, "ready toggled");

            if round.all_ready() && round.players.len() >= self.config.min_players {
                let count = round.players.len();
                let pile = PileEngine::initialize_with_hand_size(count, self.config.hand_size, rng);
                round.start(pile, self.clock.now(), self.config.turn_timeout);
                info!(players = count, "round started");
            }
            Outcome::new(round.view())
        };
        self.publish(outcome).await;
        Ok(())
    }

    /// Renames the connection's user. Allowed in any phase.
    pub async fn update_name(&self, conn: ConnId, raw: &str) -> Result<(), AppError> {
        let user_id = {
            let table = self.table.lock().await;
            table
                .round
                .connection(conn)
                .ok_or_else(DomainError::unknown_connection)?
                .user_id
                .clone()
        };
        let name = normalize_name(raw, self.config.max_name_len)?;
        self.profiles.rename(&user_id, &name).await?;
        info!(%user_id, %name, "display name updated");
        self.sync().await;
        Ok(())
    }
}
