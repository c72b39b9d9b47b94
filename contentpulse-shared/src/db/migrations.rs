//! Schema bootstrap.
//!
//! The schema is fixed and embedded at compile time from `migrations/`. It is
//! applied once at startup; there is no runtime schema editing.

use sqlx::migrate::{MigrateDatabase, Migrator};
use sqlx::postgres::PgPool;
use sqlx::Postgres;
use tracing::{debug, info, warn};

/// Embedded migrations from `contentpulse-shared/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applied-migration summary read from `_sqlx_migrations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,
    pub latest_version: Option<i64>,
    pub is_up_to_date: bool,
}

/// Applies every pending migration.
///
/// # Errors
///
/// Returns the first migration failure; sqlx rolls back the failing file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(embedded = MIGRATOR.iter().count(), "Running database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Reports how many embedded migrations have been applied.
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(status_from(0, None));
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(status_from(count.max(0) as usize, latest_version))
}

fn status_from(applied: usize, latest_version: Option<i64>) -> MigrationStatus {
    MigrationStatus {
        applied_migrations: applied,
        latest_version,
        is_up_to_date: applied >= MIGRATOR.iter().count(),
    }
}

/// Creates the target database when it is missing. Used by local setup and tests.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_present() {
        assert!(MIGRATOR.iter().count() >= 1);
    }

    #[test]
    fn test_status_from_empty_database_is_stale() {
        let status = status_from(0, None);
        assert_eq!(status.applied_migrations, 0);
        assert!(!status.is_up_to_date);
    }

    #[test]
    fn test_status_with_everything_applied() {
        let total = MIGRATOR.iter().count();
        let status = status_from(total, Some(20250101000001));
        assert!(status.is_up_to_date);
    }
}
