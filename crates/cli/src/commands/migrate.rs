//! Database migration command.
//!
//! Applies the storefront migrations from `crates/storefront/migrations/`
//! and creates the tower-sessions table. Migrations never run automatically
//! at server startup.

use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone())
        .migrate()
        .await
        .map_err(|e| CommandError::SessionStore(e.to_string()))?;

    tracing::info!("Migrations complete");
    Ok(())
}
