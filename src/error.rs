/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------
///
/// Only store access can fail out of this engine. Provider failures are
/// absorbed at the source boundary (logged, converted to "no data") and
/// arithmetic degeneracies are defined to neutral results, so no condition
/// here is fatal to the calling process.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

impl serde::Serialize for EngineError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
