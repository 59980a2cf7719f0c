//! Time series access for the historical observation store
//!
//! Pure reads plus the single gap-filling upsert the collector needs. Gaps in
//! the series are expected: callers get whatever rows exist, ordered by date,
//! and decide for themselves whether that is enough signal.

use chrono::NaiveDate;

use crate::db::DbPool;
use crate::error::EngineError;
use crate::models::Observation;

const OBSERVATION_COLUMNS: &str = "zip_code, date, aqi, pm25, pm10, o3, no2, co, \
   temperature, humidity, wind_speed, wind_direction, pressure, visibility, \
   uv_index, pollen_count, asthma_index";

/// Fetch the ordered daily series for a location over a lookback window.
///
/// Returns rows with `today - lookback_days <= date < today`, ascending by
/// date. May return fewer rows than `lookback_days`; that is not an error.
pub async fn fetch_observation_series(
  pool: &DbPool,
  zip_code: &str,
  today: NaiveDate,
  lookback_days: i64,
) -> Result<Vec<Observation>, EngineError> {
  let start = today - chrono::Duration::days(lookback_days);

  let records = sqlx::query_as::<_, Observation>(&format!(
    "SELECT {OBSERVATION_COLUMNS} FROM observations \
     WHERE zip_code = ?1 AND date >= ?2 AND date < ?3 \
     ORDER BY date ASC"
  ))
  .bind(zip_code)
  .bind(start)
  .bind(today)
  .fetch_all(pool)
  .await?;

  tracing::info!(
    "Fetched {} historical records for {} ({}-day window)",
    records.len(),
    zip_code,
    lookback_days
  );

  Ok(records)
}

/// Fetch the single observation for one (location, date), if present
pub async fn fetch_observation(
  pool: &DbPool,
  zip_code: &str,
  date: NaiveDate,
) -> Result<Option<Observation>, EngineError> {
  let record = sqlx::query_as::<_, Observation>(&format!(
    "SELECT {OBSERVATION_COLUMNS} FROM observations WHERE zip_code = ?1 AND date = ?2"
  ))
  .bind(zip_code)
  .bind(date)
  .fetch_optional(pool)
  .await?;

  Ok(record)
}

/// Insert an observation, or fill the absent fields of the existing row.
///
/// Present values are never overwritten: COALESCE keeps the stored value and
/// only adopts the new one where the stored field is NULL.
pub async fn upsert_observation(pool: &DbPool, obs: &Observation) -> Result<(), EngineError> {
  sqlx::query(
    r#"
    INSERT INTO observations (
      zip_code, date, aqi, pm25, pm10, o3, no2, co,
      temperature, humidity, wind_speed, wind_direction,
      pressure, visibility, uv_index, pollen_count, asthma_index
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
    ON CONFLICT (zip_code, date) DO UPDATE SET
      aqi = COALESCE(observations.aqi, excluded.aqi),
      pm25 = COALESCE(observations.pm25, excluded.pm25),
      pm10 = COALESCE(observations.pm10, excluded.pm10),
      o3 = COALESCE(observations.o3, excluded.o3),
      no2 = COALESCE(observations.no2, excluded.no2),
      co = COALESCE(observations.co, excluded.co),
      temperature = COALESCE(observations.temperature, excluded.temperature),
      humidity = COALESCE(observations.humidity, excluded.humidity),
      wind_speed = COALESCE(observations.wind_speed, excluded.wind_speed),
      wind_direction = COALESCE(observations.wind_direction, excluded.wind_direction),
      pressure = COALESCE(observations.pressure, excluded.pressure),
      visibility = COALESCE(observations.visibility, excluded.visibility),
      uv_index = COALESCE(observations.uv_index, excluded.uv_index),
      pollen_count = COALESCE(observations.pollen_count, excluded.pollen_count),
      asthma_index = COALESCE(observations.asthma_index, excluded.asthma_index)
    "#,
  )
  .bind(&obs.zip_code)
  .bind(obs.date)
  .bind(obs.aqi)
  .bind(obs.pm25)
  .bind(obs.pm10)
  .bind(obs.o3)
  .bind(obs.no2)
  .bind(obs.co)
  .bind(obs.temperature)
  .bind(obs.humidity)
  .bind(obs.wind_speed)
  .bind(obs.wind_direction)
  .bind(obs.pressure)
  .bind(obs.visibility)
  .bind(obs.uv_index)
  .bind(obs.pollen_count)
  .bind(obs.asthma_index)
  .execute(pool)
  .await?;

  Ok(())
}
