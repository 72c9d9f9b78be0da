//! Session-store schema migration.
//!
//! The only local table is the tower-sessions one; the backend owns every
//! business entity.

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur during migration.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error (connection or migration).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the sessions table.
///
/// # Environment Variables
///
/// - `ADLIST_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
///
/// # Errors
///
/// Returns [`MigrateError`] when the database is unreachable or the
/// migration fails.
pub async fn sessions() -> Result<(), MigrateError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADLIST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrateError::MissingEnvVar("ADLIST_DATABASE_URL"))?;

    tracing::info!("Connecting to session store...");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    tracing::info!("Running session-store migration...");
    PostgresStore::new(pool).migrate().await?;
    tracing::info!("Session store ready");

    Ok(())
}
