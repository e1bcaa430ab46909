//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Migrations from the workspace `migrations/` directory, embedded at build
/// time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies every pending migration.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does not
/// match the embedded one.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
