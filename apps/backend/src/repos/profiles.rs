//! Player profiles: display name and win count per stable user id.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;

use crate::errors::domain::{DomainError, NotFoundKind};

/// Stable identifier a client presents on every connection.
pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub wins: u32,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profiles in the order of `user_ids`. Unknown ids get a generated name
    /// and zero wins, and are stored on the spot.
    async fn resolve(&self, user_ids: &[UserId]) -> Result<Vec<Profile>, DomainError>;

    async fn rename(&self, user_id: &str, name: &str) -> Result<Profile, DomainError>;

    /// Adds one win and returns the updated profile.
    async fn increment_wins(&self, user_id: &str) -> Result<Profile, DomainError>;
}

const NAME_PARTS: [&str; 32] = [
    "Spiteful",
    "Earth",
    "Frightening",
    "Annoyed",
    "Curve",
    "Cow",
    "Heady",
    "Nonchalant",
    "Vase",
    "Stale",
    "Bizarre",
    "Uppity",
    "Optimal",
    "Clammy",
    "Story",
    "Lake",
    "Theory",
    "Bloody",
    "Paltry",
    "Watery",
    "Puncture",
    "Obnoxious",
    "Whimsical",
    "Ice",
    "Animal",
    "Jumpy",
    "Drawer",
    "Staking",
    "Afford",
    "Note",
    "Second",
    "Awful",
];

/// Two capitalised word parts, e.g. `WhimsicalCow`.
pub fn generate_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = NAME_PARTS[rng.random_range(0..NAME_PARTS.len())];
    let second = NAME_PARTS[rng.random_range(0..NAME_PARTS.len())];
    format!("{first}{second}")
}

pub(crate) fn profile_not_found(user_id: &str) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Profile,
        format!("No profile for user {user_id}."),
    )
}

/// Process-local store for tests and runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<UserId, Profile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(&self, user_id: &str) -> Profile {
        self.profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Profile {
                user_id: user_id.to_string(),
                name: generate_name(&mut rand::rng()),
                wins: 0,
            })
            .clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn resolve(&self, user_ids: &[UserId]) -> Result<Vec<Profile>, DomainError> {
        Ok(user_ids.iter().map(|id| self.get_or_create(id)).collect())
    }

    async fn rename(&self, user_id: &str, name: &str) -> Result<Profile, DomainError> {
        self.get_or_create(user_id);
        let mut entry = self
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| profile_not_found(user_id))?;
        entry.name = name.to_string();
        Ok(entry.clone())
    }

    async fn increment_wins(&self, user_id: &str) -> Result<Profile, DomainError> {
        let mut entry = self
            .profiles
            .get_mut(user_id)
            .ok_or_else(|| profile_not_found(user_id))?;
        entry.wins += 1;
        Ok(entry.clone())
    }
}
