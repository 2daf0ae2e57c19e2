/// Database migration runner
///
/// Runs the SQL migrations embedded from this crate's `migrations/`
/// directory. Both binaries call [`run_migrations`] at startup, so a
/// fresh database reaches the current schema without a separate tool.
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use tasktrack_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Migrations already applied are skipped; a failed migration is rolled
/// back and returned as an error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
