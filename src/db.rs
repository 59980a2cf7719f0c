use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::EngineError;

pub type DbPool = SqlitePool;

/// Connect to the observation store and run migrations.
///
/// The URL is sqlite (`sqlite://path?mode=rwc` or `sqlite::memory:`); the
/// store itself is owned by the ingestion side, this engine only needs the
/// observations table to exist.
pub async fn connect(db_url: &str) -> Result<DbPool, EngineError> {
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::debug!("Observation store ready at {}", db_url);

  Ok(pool)
}
