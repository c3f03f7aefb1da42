//! Error codes for the Shed backend.
//!
//! Every rejection that reaches a client carries one of these codes next to
//! its human-readable message. Add new codes here; never pass ad-hoc strings
//! as error codes.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes, one canonical SCREAMING_SNAKE_CASE string each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Phase
    /// Intent requires a round in progress
    GameNotStarted,
    /// Intent requires the lobby phase
    GameInProgress,

    // Identity
    /// Transport connection is not registered
    UnknownConnection,
    /// Identity has no roster entry
    NotJoined,
    /// Identity already has a roster entry
    AlreadyJoined,
    /// Profile store has no row for the identity
    ProfileNotFound,

    // Capacity
    /// Roster is at capacity
    GameFull,

    // Turn
    /// Acting player does not hold the turn
    OutOfTurn,

    // Play legality
    /// Card id not present in the acting hand
    CardNotInHand,
    /// Card does not match the active card
    CardNotPlaceable,
    /// Wild-type card played without a colour
    ColourRequired,

    // Input
    /// Display name rejected
    InvalidName,
    /// Malformed client message
    BadRequest,

    // Invariants
    /// Round is playing but no pile exists
    DeckNotInitialized,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Configuration error
    ConfigError,
    /// Internal server error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical string that appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GameNotStarted => "GAME_NOT_STARTED",
            Self::GameInProgress => "GAME_IN_PROGRESS",

            Self::UnknownConnection => "UNKNOWN_CONNECTION",
            Self::NotJoined => "NOT_JOINED",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",

            Self::GameFull => "GAME_FULL",

            Self::OutOfTurn => "OUT_OF_TURN",

            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::CardNotPlaceable => "CARD_NOT_PLACEABLE",
            Self::ColourRequired => "COLOUR_REQUIRED",

            Self::InvalidName => "INVALID_NAME",
            Self::BadRequest => "BAD_REQUEST",

            Self::DeckNotInitialized => "DECK_NOT_INITIALIZED",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
