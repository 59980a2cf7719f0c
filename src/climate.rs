//! Climate snapshot assembly
//!
//! Builds the one-day reading set the risk scorer consumes. Data quality
//! tiers, best first: live provider readings, historical-analysis forecasts
//! (future dates only), synthetic baseline. The baseline always exists, so
//! assembly never fails.

use chrono::NaiveDate;

use crate::baseline::generate_baseline;
use crate::db::DbPool;
use crate::forecast::forecast_air_quality;
use crate::history::fetch_observation_series;
use crate::models::Observation;
use crate::provider::LiveReadingSource;
use crate::settings::ProviderConfig;

/// Lookback window for the historical series behind a forecast
const FORECAST_LOOKBACK_DAYS: i64 = 30;

pub struct ClimateDataService {
  live: LiveReadingSource,
}

impl ClimateDataService {
  pub fn new(config: ProviderConfig) -> Self {
    Self {
      live: LiveReadingSource::new(config),
    }
  }

  /// Snapshot for one (zip, date): live readings merged over the synthetic
  /// baseline, live winning field-by-field
  pub async fn snapshot(&self, zip_code: &str, date: NaiveDate) -> Observation {
    let baseline = generate_baseline(zip_code, date);

    match self.live.fetch(zip_code, date).await {
      Some(mut live) => {
        live.fill_missing_from(&baseline);
        tracing::info!("Merged live provider data for zip {}", zip_code);
        live
      }
      None => {
        tracing::info!("Using synthetic baseline for zip {} (no live data)", zip_code);
        baseline
      }
    }
  }

  /// Snapshot with the forecast tier applied for future dates.
  ///
  /// When `target_date` is past `today` and enough history exists, the
  /// forecasted aqi/pm25 override the baseline values. A store failure or a
  /// declined forecast degrades to the plain snapshot, never an error.
  pub async fn snapshot_with_forecast(
    &self,
    pool: &DbPool,
    zip_code: &str,
    today: NaiveDate,
    target_date: NaiveDate,
  ) -> Observation {
    if target_date > today {
      let days_ahead = (target_date - today).num_days();

      let series = match fetch_observation_series(pool, zip_code, today, FORECAST_LOOKBACK_DAYS).await
      {
        Ok(series) => series,
        Err(e) => {
          tracing::warn!("History fetch failed for {}: {}, using baseline", zip_code, e);
          vec![]
        }
      };

      let forecasts = forecast_air_quality(&series, today, days_ahead);
      if let Some(forecast) = forecasts.into_iter().find(|f| f.date == target_date) {
        let mut obs = generate_baseline(zip_code, target_date);
        obs.aqi = Some(forecast.aqi);
        obs.pm25 = Some(forecast.pm25);
        tracing::info!(
          "Using forecast data for {} on {} (low_confidence={})",
          zip_code,
          target_date,
          forecast.low_confidence
        );
        return obs;
      }
    }

    self.snapshot(zip_code, target_date).await
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
