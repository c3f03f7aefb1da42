use std::collections::HashSet;

use shed_backend::errors::ErrorCode;

#[test]
fn error_codes_are_unique() {
    let all = [
        // Keep in sync with ErrorCode enum variants
        ErrorCode::GameNotStarted,
        ErrorCode::GameInProgress,
        ErrorCode::UnknownConnection,
        ErrorCode::NotJoined,
        ErrorCode::AlreadyJoined,
        ErrorCode::ProfileNotFound,
        ErrorCode::GameFull,
        ErrorCode::OutOfTurn,
        ErrorCode::CardNotInHand,
        ErrorCode::CardNotPlaceable,
        ErrorCode::ColourRequired,
        ErrorCode::InvalidName,
        ErrorCode::BadRequest,
        ErrorCode::DeckNotInitialized,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::ConfigError,
        ErrorCode::Internal,
    ];

    let mut seen = HashSet::new();
    for code in all {
        let s = code.as_str();
        assert!(seen.insert(s), "Duplicate error code string: {s}");
        assert!(
            s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
            "Error code is not SCREAMING_SNAKE_CASE: {s}"
        );
    }
}
