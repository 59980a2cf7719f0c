//! Trend, seasonality, and forecast computation
//!
//! Everything here is a pure function of the historical series. Absence of
//! signal is always a neutral result (zero trend, empty forecast), never an
//! error: a sparse series degrades the forecast, it does not abort it.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Metric, Observation};

/// Damping applied to the weekly seasonal deviation so it cannot override
/// the trend signal
const SEASONAL_WEIGHT: f64 = 0.3;

/// Amplitude of the bounded 7-day cyclical term. Cosmetic variation only,
/// not a physical signal.
const CYCLE_AMPLITUDE: f64 = 5.0;

/// Minimum usable days of history before a forecast is attempted. Below
/// this a trend/seasonal fit is not distinguishable from noise.
const MIN_HISTORY_DAYS: usize = 3;

/// ---------------------------------------------------------------------------
/// Trend Analyzer
/// ---------------------------------------------------------------------------

/// Least-squares slope of a metric against the ordinal position of its
/// retained (non-missing) points.
///
/// Points where the metric is absent are skipped, not treated as zero.
/// Fewer than 2 usable points, or a zero-variance index set, yields 0.0.
pub fn analyze_trend(series: &[Observation], metric: Metric) -> f64 {
  let values: Vec<f64> = series.iter().filter_map(|obs| obs.metric(metric)).collect();

  if values.len() < 2 {
    return 0.0;
  }

  let n = values.len();
  let x_mean = (n - 1) as f64 / 2.0;
  let y_mean = values.iter().sum::<f64>() / n as f64;

  let mut numerator = 0.0;
  let mut denominator = 0.0;
  for (i, value) in values.iter().enumerate() {
    let dx = i as f64 - x_mean;
    numerator += dx * (value - y_mean);
    denominator += dx * dx;
  }

  if denominator == 0.0 {
    return 0.0;
  }

  numerator / denominator
}

/// ---------------------------------------------------------------------------
/// Seasonality Detector
/// ---------------------------------------------------------------------------

/// Per-weekday historical mean of one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalProfile {
  /// Mean by weekday index (0 = Monday). 0.0 marks a bucket with no
  /// observations; consumers treat that as "not yet known", not "is low".
  pub weekday_mean: [f64; 7],
}

pub fn detect_seasonality(series: &[Observation], metric: Metric) -> SeasonalProfile {
  let mut sums = [0.0f64; 7];
  let mut counts = [0usize; 7];

  for obs in series {
    if let Some(value) = obs.metric(metric) {
      let weekday = obs.date.weekday().num_days_from_monday() as usize;
      sums[weekday] += value;
      counts[weekday] += 1;
    }
  }

  let mut weekday_mean = [0.0f64; 7];
  for weekday in 0..7 {
    if counts[weekday] > 0 {
      weekday_mean[weekday] = sums[weekday] / counts[weekday] as f64;
    }
  }

  SeasonalProfile { weekday_mean }
}

impl SeasonalProfile {
  /// Seasonal mean for a weekday, falling back to `latest` when the bucket
  /// has never been observed (its marker value 0.0 carries no signal)
  fn for_weekday_or(&self, weekday: usize, latest: f64) -> f64 {
    let mean = self.weekday_mean[weekday];
    if mean == 0.0 {
      latest
    } else {
      mean
    }
  }
}

/// ---------------------------------------------------------------------------
/// Forecaster
/// ---------------------------------------------------------------------------

/// Where a forecast's numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastProvenance {
  /// Derived from trend + seasonality over real stored history
  HistoricalAnalysis,
  /// Synthetic baseline; no historical fit behind it
  Synthetic,
}

/// Clamped future-value estimate for the forecast-supported metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
  pub zip_code: String,
  pub date: NaiveDate,
  pub aqi: f64,
  pub pm25: f64,
  pub provenance: ForecastProvenance,
  /// Set when the latest reading was missing and a neutral default stood in
  pub low_confidence: bool,
}

/// Forecast air-quality metrics for the next `days_ahead` days.
///
/// Declines (returns an empty vec) when fewer than 3 days of usable history
/// exist; the caller must then fall back to synthetic baseline generation.
pub fn forecast_air_quality(
  series: &[Observation],
  today: NaiveDate,
  days_ahead: i64,
) -> Vec<Forecast> {
  let usable = series
    .iter()
    .filter(|obs| obs.aqi.is_some() || obs.pm25.is_some())
    .count();
  if series.len() < MIN_HISTORY_DAYS || usable == 0 {
    tracing::warn!(
      "Insufficient history ({} days, {} usable) for forecast, declining",
      series.len(),
      usable
    );
    return vec![];
  }

  let Some(latest) = series.last() else {
    return vec![];
  };

  let zip_code = latest.zip_code.clone();
  let low_confidence = latest.aqi.is_none() || latest.pm25.is_none();
  let base_aqi = latest.metric_or_default(Metric::Aqi);
  let base_pm25 = latest.metric_or_default(Metric::Pm25);

  let aqi_trend = analyze_trend(series, Metric::Aqi);
  let pm25_trend = analyze_trend(series, Metric::Pm25);
  let aqi_seasonal = detect_seasonality(series, Metric::Aqi);
  let pm25_seasonal = detect_seasonality(series, Metric::Pm25);

  let mut forecasts = Vec::with_capacity(days_ahead.max(0) as usize);

  for day_offset in 1..=days_ahead {
    let future_date = today + Duration::days(day_offset);
    let weekday = future_date.weekday().num_days_from_monday() as usize;

    let aqi_seasonal_component = aqi_seasonal.for_weekday_or(weekday, base_aqi) - base_aqi;
    let pm25_seasonal_component = pm25_seasonal.for_weekday_or(weekday, base_pm25) - base_pm25;

    let cycle = (day_offset as f64 * 2.0 * std::f64::consts::PI / 7.0).sin() * CYCLE_AMPLITUDE;

    let predicted_aqi = base_aqi
      + aqi_trend * day_offset as f64
      + aqi_seasonal_component * SEASONAL_WEIGHT
      + cycle;
    let predicted_pm25 = base_pm25
      + pm25_trend * day_offset as f64
      + pm25_seasonal_component * SEASONAL_WEIGHT
      + cycle * 0.5;

    forecasts.push(Forecast {
      zip_code: zip_code.clone(),
      date: future_date,
      aqi: round1(Metric::Aqi.clamp(predicted_aqi)),
      pm25: round2(Metric::Pm25.clamp(predicted_pm25)),
      provenance: ForecastProvenance::HistoricalAnalysis,
      low_confidence,
    });
  }

  forecasts
}

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
