use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One location-day's environmental snapshot.
///
/// Every metric is optional: `None` means "not observed", never zero.
/// At most one row exists per (zip_code, date).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Observation {
  pub zip_code: String,
  pub date: NaiveDate,
  pub aqi: Option<f64>,
  pub pm25: Option<f64>,
  pub pm10: Option<f64>,
  pub o3: Option<f64>,
  pub no2: Option<f64>,
  pub co: Option<f64>,
  pub temperature: Option<f64>,
  pub humidity: Option<f64>,
  pub wind_speed: Option<f64>,
  pub wind_direction: Option<f64>,
  pub pressure: Option<f64>,
  pub visibility: Option<f64>,
  pub uv_index: Option<f64>,
  pub pollen_count: Option<f64>,
  pub asthma_index: Option<f64>,
}

impl Observation {
  /// An observation with every metric absent
  pub fn empty(zip_code: &str, date: NaiveDate) -> Self {
    Self {
      zip_code: zip_code.to_string(),
      date,
      aqi: None,
      pm25: None,
      pm10: None,
      o3: None,
      no2: None,
      co: None,
      temperature: None,
      humidity: None,
      wind_speed: None,
      wind_direction: None,
      pressure: None,
      visibility: None,
      uv_index: None,
      pollen_count: None,
      asthma_index: None,
    }
  }

  /// Read one metric by selector
  pub fn metric(&self, metric: Metric) -> Option<f64> {
    match metric {
      Metric::Aqi => self.aqi,
      Metric::Pm25 => self.pm25,
      Metric::Pm10 => self.pm10,
      Metric::O3 => self.o3,
      Metric::No2 => self.no2,
      Metric::Co => self.co,
      Metric::Temperature => self.temperature,
      Metric::Humidity => self.humidity,
      Metric::WindSpeed => self.wind_speed,
      Metric::Pollen => self.pollen_count,
      Metric::AsthmaIndex => self.asthma_index,
    }
  }

  /// Read one metric, substituting its neutral default when absent
  pub fn metric_or_default(&self, metric: Metric) -> f64 {
    self.metric(metric).unwrap_or_else(|| metric.neutral_default())
  }

  /// Fill absent fields from another observation. Present values are never
  /// overwritten (observations are append-only except for filling gaps).
  pub fn fill_missing_from(&mut self, other: &Observation) {
    self.aqi = self.aqi.or(other.aqi);
    self.pm25 = self.pm25.or(other.pm25);
    self.pm10 = self.pm10.or(other.pm10);
    self.o3 = self.o3.or(other.o3);
    self.no2 = self.no2.or(other.no2);
    self.co = self.co.or(other.co);
    self.temperature = self.temperature.or(other.temperature);
    self.humidity = self.humidity.or(other.humidity);
    self.wind_speed = self.wind_speed.or(other.wind_speed);
    self.wind_direction = self.wind_direction.or(other.wind_direction);
    self.pressure = self.pressure.or(other.pressure);
    self.visibility = self.visibility.or(other.visibility);
    self.uv_index = self.uv_index.or(other.uv_index);
    self.pollen_count = self.pollen_count.or(other.pollen_count);
    self.asthma_index = self.asthma_index.or(other.asthma_index);
  }
}

/// Selector for a single named metric on an [`Observation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
  Aqi,
  Pm25,
  Pm10,
  O3,
  No2,
  Co,
  Temperature,
  Humidity,
  WindSpeed,
  Pollen,
  AsthmaIndex,
}

impl Metric {
  /// Neutral stand-in used when a reading is absent but a formula still
  /// needs a well-defined value
  pub fn neutral_default(&self) -> f64 {
    match self {
      Metric::Aqi => 50.0,
      Metric::Pm25 => 15.0,
      Metric::Pm10 => 25.0,
      Metric::O3 => 0.045,
      Metric::No2 => 35.0,
      Metric::Co => 0.8,
      Metric::Temperature => 20.0,
      Metric::Humidity => 60.0,
      Metric::WindSpeed => 5.0,
      Metric::Pollen => 50.0,
      Metric::AsthmaIndex => 30.0,
    }
  }

  /// Valid physical range for forecasts of this metric
  pub fn bounds(&self) -> (f64, f64) {
    match self {
      Metric::Aqi | Metric::Pm25 | Metric::Pm10 => (0.0, 500.0),
      Metric::O3 => (0.0, 1.0),
      Metric::No2 => (0.0, 500.0),
      Metric::Co => (0.0, 50.0),
      Metric::Temperature => (-50.0, 60.0),
      Metric::Humidity => (0.0, 100.0),
      Metric::WindSpeed => (0.0, 150.0),
      Metric::Pollen => (0.0, 1000.0),
      Metric::AsthmaIndex => (0.0, 100.0),
    }
  }

  /// Clamp a value to this metric's physical range
  pub fn clamp(&self, value: f64) -> f64 {
    let (lo, hi) = self.bounds();
    value.clamp(lo, hi)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn test_metric_selector_reads_fields() {
    let mut obs = Observation::empty("10001", date("2025-06-01"));
    obs.aqi = Some(72.0);
    obs.pollen_count = Some(80.0);

    assert_eq!(obs.metric(Metric::Aqi), Some(72.0));
    assert_eq!(obs.metric(Metric::Pollen), Some(80.0));
    assert_eq!(obs.metric(Metric::Pm25), None);
  }

  #[test]
  fn test_metric_or_default_substitutes_neutral_value() {
    let obs = Observation::empty("10001", date("2025-06-01"));
    assert_eq!(obs.metric_or_default(Metric::Aqi), 50.0);
    assert_eq!(obs.metric_or_default(Metric::Pm25), 15.0);
    assert_eq!(obs.metric_or_default(Metric::Temperature), 20.0);
  }

  #[test]
  fn test_fill_missing_never_overwrites_present_values() {
    let mut target = Observation::empty("10001", date("2025-06-01"));
    target.aqi = Some(60.0);

    let mut source = Observation::empty("10001", date("2025-06-01"));
    source.aqi = Some(99.0);
    source.pm25 = Some(12.0);

    target.fill_missing_from(&source);

    assert_eq!(target.aqi, Some(60.0)); // kept
    assert_eq!(target.pm25, Some(12.0)); // filled
  }

  #[test]
  fn test_clamp_respects_metric_bounds() {
    assert_eq!(Metric::Aqi.clamp(612.0), 500.0);
    assert_eq!(Metric::Aqi.clamp(-3.0), 0.0);
    assert_eq!(Metric::Humidity.clamp(104.0), 100.0);
  }
}
