//! Connection pool and embedded schema migrations.
//!
//! Lecture and session queries share this pool. The chat path never touches
//! the database, so a slow database cannot delay FAQ answers.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect with at most `max_connections` and apply `src/db/migrations`.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new().max_connections(max_connections).connect(database_url).await?;
    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    tracing::info!(max_connections, "db: migrations applied");
    Ok(pool)
}
