//! SeaORM adapter for the profile store, with a write-through cache.

use async_trait::async_trait;
use dashmap::DashMap;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info};

use crate::entities::users;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::profiles::{generate_name, profile_not_found, Profile, ProfileStore, UserId};

pub struct SeaProfileStore {
    db: DatabaseConnection,
    cache: DashMap<UserId, Profile>,
}

impl SeaProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            cache: DashMap::new(),
        }
    }

    async fn load_or_create(&self, user_id: &str) -> Result<Profile, DomainError> {
        if let Some(hit) = self.cache.get(user_id) {
            return Ok(hit.clone());
        }

        let found = users::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(db_unavailable)?;

        let model = match found {
            Some(model) => model,
            None => {
                let name = generate_name(&mut rand::rng());
                let model = users::ActiveModel {
                    id: Set(user_id.to_string()),
                    name: Set(name),
                    wins: Set(0),
                }
                .insert(&self.db)
                .await
                .map_err(db_unavailable)?;
                info!(user_id, name = %model.name, "created profile");
                model
            }
        };

        let profile = to_profile(model);
        self.cache.insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl ProfileStore for SeaProfileStore {
    async fn resolve(&self, user_ids: &[UserId]) -> Result<Vec<Profile>, DomainError> {
        let mut profiles = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            profiles.push(self.load_or_create(user_id).await?);
        }
        Ok(profiles)
    }

    async fn rename(&self, user_id: &str, name: &str) -> Result<Profile, DomainError> {
        self.load_or_create(user_id).await?;
        users::Entity::update_many()
            .col_expr(users::Column::Name, Expr::value(name))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_unavailable)?;

        let mut entry = self
            .cache
            .get_mut(user_id)
            .ok_or_else(|| profile_not_found(user_id))?;
        entry.name = name.to_string();
        debug!(user_id, name, "profile renamed");
        Ok(entry.clone())
    }

    async fn increment_wins(&self, user_id: &str) -> Result<Profile, DomainError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Wins,
                Expr::col(users::Column::Wins).add(1),
            )
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_unavailable)?;
        if result.rows_affected == 0 {
            return Err(profile_not_found(user_id));
        }

        // make sure the cache holds the row, then mirror the increment
        self.cache.remove(user_id);
        let profile = self.load_or_create(user_id).await?;
        debug!(user_id, wins = profile.wins, "win recorded");
        Ok(profile)
    }
}

fn to_profile(model: users::Model) -> Profile {
    Profile {
        user_id: model.id,
        name: model.name,
        wins: u32::try_from(model.wins).unwrap_or(0),
    }
}

fn db_unavailable(e: DbErr) -> DomainError {
    DomainError::infra(
        InfraErrorKind::DbUnavailable,
        format!("Profile store unavailable: {e}"),
    )
}
