//! Historical backfill collector
//!
//! Walks backwards from today and fills the observation store for each
//! tracked location. Days that already have a row are left alone (the
//! gap-filling upsert only adopts values for absent fields), and a failed
//! day is logged and skipped so one bad fetch never aborts a backfill run.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::climate::ClimateDataService;
use crate::db::DbPool;
use crate::history::{fetch_observation, upsert_observation};
use crate::settings::ProviderConfig;

/// Pause between per-day fetches, and the longer pause between locations.
/// Keeps the backfill polite toward rate-limited providers.
const DAY_DELAY: std::time::Duration = std::time::Duration::from_millis(500);
const ZIP_DELAY: std::time::Duration = std::time::Duration::from_secs(2);

pub struct HistoricalDataCollector {
  climate: ClimateDataService,
}

impl HistoricalDataCollector {
  pub fn new(config: ProviderConfig) -> Self {
    Self {
      climate: ClimateDataService::new(config),
    }
  }

  /// Backfill the last `days` days for one location. Returns the number of
  /// days actually written.
  pub async fn collect_for_zip(
    &self,
    pool: &DbPool,
    zip_code: &str,
    today: NaiveDate,
    days: i64,
  ) -> u32 {
    let mut stored = 0u32;

    for i in 1..=days {
      let date = today - Duration::days(i);

      match fetch_observation(pool, zip_code, date).await {
        Ok(Some(_)) => {
          tracing::debug!("Skipping {} on {}: row already present", zip_code, date);
          continue;
        }
        Ok(None) => {}
        Err(e) => {
          tracing::warn!("Existence check failed for {} on {}: {}", zip_code, date, e);
          continue;
        }
      }

      let obs = self.climate.snapshot(zip_code, date).await;
      match upsert_observation(pool, &obs).await {
        Ok(()) => stored += 1,
        Err(e) => {
          tracing::warn!("Failed to store {} on {}: {}", zip_code, date, e);
          continue;
        }
      }

      if i < days {
        tokio::time::sleep(DAY_DELAY).await;
      }
    }

    tracing::info!("Backfilled {} days for {}", stored, zip_code);
    stored
  }

  /// Backfill every listed location. Returns the per-location counts of
  /// days written.
  pub async fn collect_for_zip_codes(
    &self,
    pool: &DbPool,
    zip_codes: &[&str],
    today: NaiveDate,
    days: i64,
  ) -> HashMap<String, u32> {
    let mut counts = HashMap::new();

    for (idx, zip_code) in zip_codes.iter().enumerate() {
      let stored = self.collect_for_zip(pool, zip_code, today, days).await;
      counts.insert(zip_code.to_string(), stored);

      if idx + 1 < zip_codes.len() {
        tokio::time::sleep(ZIP_DELAY).await;
      }
    }

    counts
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
