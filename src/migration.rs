//! Schema migrations: ordered SQL files under `migrations/`, embedded at compile time.

use crate::error::StartupError;
use sqlx::migrate::Migrator;
use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations. Already-applied versions are skipped; a changed or failing script is an error.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), StartupError> {
    MIGRATOR.run(pool).await?;
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or(0);
    tracing::info!(version = latest, "database migrations applied");
    Ok(())
}
