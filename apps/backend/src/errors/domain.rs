//! Domain-level error type used by the pile engine and the round service.
//!
//! This error type is transport- and DB-agnostic. Every variant is
//! recoverable: callers turn it into an error notice for the acting
//! connection and leave round state untouched.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

/// Rule and input violations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Intent needs a round in progress
    GameNotStarted,
    /// Intent needs the lobby phase
    GameInProgress,
    OutOfTurn,
    CardNotInHand,
    CardNotPlaceable,
    ColourRequired,
    InvalidName,
    Other(String),
}

/// Missing identities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Connection,
    Player,
    Profile,
}

/// Roster conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    AlreadyJoined,
    GameFull,
}

/// Invariant and operational failures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    /// Round marked playing without a pile
    DeckNotInitialized,
    DbUnavailable,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or game rule violation
    Validation(ValidationKind, String),
    /// Roster conflict
    Conflict(ConflictKind, String),
    /// Unknown connection or player
    NotFound(NotFoundKind, String),
    /// Invariant or infrastructure failure
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn game_not_started() -> Self {
        Self::validation(ValidationKind::GameNotStarted, "Game not started.")
    }
    pub fn game_in_progress() -> Self {
        Self::validation(ValidationKind::GameInProgress, "Game already started.")
    }
    pub fn unknown_connection() -> Self {
        Self::not_found(NotFoundKind::Connection, "Connection not found.")
    }
    pub fn not_joined() -> Self {
        Self::not_found(NotFoundKind::Player, "Player has not joined.")
    }
    pub fn deck_not_initialized() -> Self {
        Self::infra(InfraErrorKind::DeckNotInitialized, "Deck not found.")
    }

    /// Human-readable message sent to clients.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Infra(_, d) => d,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::GameNotStarted => ErrorCode::GameNotStarted,
                ValidationKind::GameInProgress => ErrorCode::GameInProgress,
                ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                ValidationKind::CardNotPlaceable => ErrorCode::CardNotPlaceable,
                ValidationKind::ColourRequired => ErrorCode::ColourRequired,
                ValidationKind::InvalidName => ErrorCode::InvalidName,
                ValidationKind::Other(_) => ErrorCode::BadRequest,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::AlreadyJoined => ErrorCode::AlreadyJoined,
                ConflictKind::GameFull => ErrorCode::GameFull,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Connection => ErrorCode::UnknownConnection,
                NotFoundKind::Player => ErrorCode::NotJoined,
                NotFoundKind::Profile => ErrorCode::ProfileNotFound,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::DeckNotInitialized => ErrorCode::DeckNotInitialized,
                InfraErrorKind::DbUnavailable => ErrorCode::DbUnavailable,
                InfraErrorKind::Other(_) => ErrorCode::Internal,
            },
        }
    }
}
