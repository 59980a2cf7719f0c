//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Observation and profile factories
//! - Helper assertions

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::history::upsert_observation;
use crate::models::{Observation, UserHealthProfile};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert one observation row for a (zip, date), with the given AQI and a
/// proportional PM2.5
pub async fn seed_observation(
  pool: &SqlitePool,
  zip_code: &str,
  date: NaiveDate,
  aqi: Option<f64>,
) {
  let obs = observation_with_aqi(zip_code, date, aqi);
  upsert_observation(pool, &obs)
    .await
    .expect("Failed to seed observation");
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Observation carrying only air-quality metrics: the given AQI plus a
/// PM2.5 reading derived from it. `None` leaves both absent.
pub fn observation_with_aqi(zip_code: &str, date: NaiveDate, aqi: Option<f64>) -> Observation {
  let mut obs = Observation::empty(zip_code, date);
  obs.aqi = aqi;
  obs.pm25 = aqi.map(|a| a * 0.3);
  obs
}

/// A fully neutral day: every reading sits exactly on its neutral default,
/// so formula tests get round numbers
pub fn moderate_day_observation(zip_code: &str, date: NaiveDate) -> Observation {
  let mut obs = Observation::empty(zip_code, date);
  obs.aqi = Some(50.0);
  obs.pm25 = Some(15.0);
  obs.temperature = Some(20.0);
  obs.humidity = Some(60.0);
  obs.wind_speed = Some(5.0);
  obs.pollen_count = Some(50.0);
  obs
}

/// Create a mock health profile for testing
pub fn mock_health_profile() -> UserHealthProfile {
  UserHealthProfile {
    asthma_severity: Some("moderate".to_string()),
    asthma_control: Some("partially-controlled".to_string()),
    symptom_frequency: Some("weekly".to_string()),
    trigger_factors: Some(r#"["pollen", "air quality"]"#.to_string()),
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'observations'",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_observation_round_trips() {
    let pool = setup_test_db().await;
    let day = date("2025-06-01");

    seed_observation(&pool, "10001", day, Some(60.0)).await;

    let stored = crate::history::fetch_observation(&pool, "10001", day)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.aqi, Some(60.0));
    assert_eq!(stored.pm25, Some(18.0));
    assert!(stored.temperature.is_none());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let obs = moderate_day_observation("10001", date("2025-06-01"));
    assert_eq!(obs.aqi, Some(50.0));
    assert!(obs.asthma_index.is_none());

    let profile = mock_health_profile();
    assert_eq!(profile.triggers(), vec!["pollen", "air quality"]);
  }
}
