//! Round settings read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::{DECK_SIZE, HAND_SIZE};
use crate::error::AppError;

/// Whether a viewer sees opponents' cards or only their counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandVisibility {
    #[default]
    Exposed,
    Own,
}

impl FromStr for HandVisibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exposed" => Ok(HandVisibility::Exposed),
            "own" => Ok(HandVisibility::Own),
            other => Err(AppError::config(format!(
                "SHED_HAND_VISIBILITY must be 'exposed' or 'own', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub min_players: usize,
    pub max_players: usize,
    pub hand_size: usize,
    pub turn_timeout: Duration,
    pub tick_interval: Duration,
    pub max_name_len: usize,
    pub hand_visibility: HandVisibility,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            hand_size: HAND_SIZE,
            turn_timeout: Duration::from_millis(30_500),
            tick_interval: Duration::from_millis(1_000),
            max_name_len: 24,
            hand_visibility: HandVisibility::Exposed,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by any `SHED_*` variables that are set.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            min_players: parse_var("SHED_MIN_PLAYERS", defaults.min_players)?,
            max_players: parse_var("SHED_MAX_PLAYERS", defaults.max_players)?,
            hand_size: parse_var("SHED_HAND_SIZE", defaults.hand_size)?,
            turn_timeout: Duration::from_millis(parse_var(
                "SHED_TURN_TIMEOUT_MS",
                defaults.turn_timeout.as_millis() as u64,
            )?),
            tick_interval: Duration::from_millis(parse_var(
                "SHED_TICK_INTERVAL_MS",
                defaults.tick_interval.as_millis() as u64,
            )?),
            max_name_len: parse_var("SHED_MAX_NAME_LEN", defaults.max_name_len)?,
            hand_visibility: match env::var("SHED_HAND_VISIBILITY") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.hand_visibility,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_players < 2 {
            return Err(AppError::config("SHED_MIN_PLAYERS must be at least 2"));
        }
        if self.max_players < self.min_players {
            return Err(AppError::config(
                "SHED_MAX_PLAYERS must not be below SHED_MIN_PLAYERS",
            ));
        }
        if self.hand_size == 0 {
            return Err(AppError::config("SHED_HAND_SIZE must be positive"));
        }
        // at least one card has to stay behind as the active card
        if self.max_players * self.hand_size >= DECK_SIZE {
            return Err(AppError::config(format!(
                "{} players x {} cards leaves no pile",
                self.max_players, self.hand_size
            )));
        }
        if self.turn_timeout.is_zero() || self.tick_interval.is_zero() {
            return Err(AppError::config("Timeouts must be positive"));
        }
        if self.max_name_len == 0 {
            return Err(AppError::config("SHED_MAX_NAME_LEN must be positive"));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
