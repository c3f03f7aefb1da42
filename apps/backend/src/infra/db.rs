use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connects to the profile database without running migrations.
pub async fn connect_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile);
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    if *profile == DbProfile::InMemory {
        // every pooled connection would otherwise see its own empty database
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Connects and brings the schema up to date.
pub async fn bootstrap_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;
    migration::migrate_up(&conn)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;
    let applied = migration::count_applied_migrations(&conn).await.unwrap_or(0);
    info!(?profile, applied, "profile database ready");
    Ok(conn)
}
