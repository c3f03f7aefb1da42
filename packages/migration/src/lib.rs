pub use sea_orm::{ConnectionTrait, DatabaseConnection};
pub use sea_orm_migration::prelude::*;

mod m20260301_000001_users; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260301_000001_users::Migration)]
    }
}

/// Apply every pending migration, logging the applied count on both sides.
pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    let before = count_applied_migrations(db).await.unwrap_or(0);
    tracing::info!(
        applied = before,
        defined = Migrator::migrations().len(),
        backend = ?db.get_database_backend(),
        "running migrations"
    );

    match Migrator::up(db, None).await {
        Ok(()) => {
            let after = count_applied_migrations(db).await.unwrap_or(0);
            tracing::info!(applied = after, "migrations up to date");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "migration failed");
            Err(e)
        }
    }
}

/// Number of applied migrations; 0 when the bookkeeping table is missing.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the most recently applied migration, if any.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
