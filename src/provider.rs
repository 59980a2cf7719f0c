//! Live reading source for external weather and air-quality providers
//!
//! Both providers are unreliable collaborators: any field may be absent and
//! any call may fail outright. Transport failures are absorbed here and
//! reported upward as "no data" so a flaky provider can never abort a
//! request; the engine always has the synthetic baseline to fall back on.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::models::Observation;
use crate::settings::ProviderConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
  #[error("Provider not configured: {0}")]
  NotConfigured(&'static str),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Provider returned status {0}")]
  Status(reqwest::StatusCode),

  #[error("Malformed provider URL: {0}")]
  Url(#[from] url::ParseError),
}

/// ---------------------------------------------------------------------------
/// Provider Payloads
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WeatherResponse {
  main: Option<WeatherMain>,
  wind: Option<WeatherWind>,
  /// Meters; converted to km on merge
  visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
  temp: Option<f64>,
  humidity: Option<f64>,
  pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherWind {
  speed: Option<f64>,
  deg: Option<f64>,
}

/// One per-parameter reading from the air-quality provider
#[derive(Debug, Deserialize)]
struct AirQualityReading {
  #[serde(rename = "ParameterName", default)]
  parameter: String,
  #[serde(rename = "AQI", default)]
  aqi: Option<f64>,
  #[serde(rename = "Concentration", default)]
  concentration: Option<f64>,
}

/// ---------------------------------------------------------------------------
/// Live Reading Source
/// ---------------------------------------------------------------------------

pub struct LiveReadingSource {
  client: Client,
  config: ProviderConfig,
}

impl LiveReadingSource {
  pub fn new(config: ProviderConfig) -> Self {
    Self {
      client: Client::new(),
      config,
    }
  }

  /// Fetch the partial observation the live providers can supply today.
  ///
  /// Returns `None` when no provider is configured, both providers fail, or
  /// neither returns a usable reading. Never propagates a transport error.
  pub async fn fetch(&self, zip_code: &str, date: NaiveDate) -> Option<Observation> {
    let mut obs = Observation::empty(zip_code, date);

    match self.fetch_weather(zip_code).await {
      Ok(weather) => {
        if let Some(main) = weather.main {
          obs.temperature = main.temp;
          obs.humidity = main.humidity;
          obs.pressure = main.pressure;
        }
        if let Some(wind) = weather.wind {
          obs.wind_speed = wind.speed;
          obs.wind_direction = wind.deg;
        }
        obs.visibility = weather.visibility.map(|m| m / 1000.0);
      }
      Err(ProviderError::NotConfigured(name)) => {
        tracing::debug!("{} provider not configured, skipping", name);
      }
      Err(e) => {
        tracing::warn!("Weather provider error for {}: {}", zip_code, e);
      }
    }

    match self.fetch_air_quality(zip_code, date).await {
      Ok(readings) => self.merge_air_quality(&mut obs, &readings),
      Err(ProviderError::NotConfigured(name)) => {
        tracing::debug!("{} provider not configured, skipping", name);
      }
      Err(e) => {
        tracing::warn!("Air-quality provider error for {}: {}", zip_code, e);
      }
    }

    // Derive the composite asthma index when the provider gave us an AQI
    if obs.asthma_index.is_none() {
      obs.asthma_index = obs.aqi.map(asthma_index_from_aqi);
    }

    if obs.temperature.is_some() || obs.aqi.is_some() {
      Some(obs)
    } else {
      None
    }
  }

  async fn fetch_weather(&self, zip_code: &str) -> Result<WeatherResponse, ProviderError> {
    let api_key = self
      .config
      .weather_api_key
      .as_deref()
      .ok_or(ProviderError::NotConfigured("weather"))?;

    let url = Url::parse_with_params(
      &format!("{}/weather", self.config.weather_base_url),
      &[
        ("zip", format!("{},US", zip_code).as_str()),
        ("appid", api_key),
        ("units", "metric"),
      ],
    )?;

    let response = self
      .client
      .get(url)
      .timeout(REQUEST_TIMEOUT)
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(ProviderError::Status(response.status()));
    }

    Ok(response.json::<WeatherResponse>().await?)
  }

  async fn fetch_air_quality(
    &self,
    zip_code: &str,
    date: NaiveDate,
  ) -> Result<Vec<AirQualityReading>, ProviderError> {
    let api_key = self
      .config
      .air_quality_api_key
      .as_deref()
      .ok_or(ProviderError::NotConfigured("air-quality"))?;

    let date_param = date.format("%Y-%m-%d").to_string();
    let url = Url::parse_with_params(
      &format!("{}/observation/zipCode/current/", self.config.air_quality_base_url),
      &[
        ("format", "application/json"),
        ("zipCode", zip_code),
        ("date", date_param.as_str()),
        ("distance", "25"),
        ("API_KEY", api_key),
      ],
    )?;

    let response = self
      .client
      .get(url)
      .timeout(REQUEST_TIMEOUT)
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(ProviderError::Status(response.status()));
    }

    Ok(response.json::<Vec<AirQualityReading>>().await?)
  }

  /// Fold per-parameter readings into the observation. The overall AQI is
  /// the worst (highest) per-parameter AQI reported.
  fn merge_air_quality(&self, obs: &mut Observation, readings: &[AirQualityReading]) {
    for reading in readings {
      match reading.parameter.as_str() {
        "PM2.5" => obs.pm25 = reading.concentration.or(obs.pm25),
        "PM10" => obs.pm10 = reading.concentration.or(obs.pm10),
        "O3" => {
          // ppb payloads get converted to ppm
          obs.o3 = reading
            .concentration
            .map(|v| if v > 1.0 { v / 1000.0 } else { v })
            .or(obs.o3);
        }
        "NO2" => obs.no2 = reading.concentration.or(obs.no2),
        "CO" => obs.co = reading.concentration.or(obs.co),
        _ => {}
      }

      if let Some(aqi) = reading.aqi {
        if obs.aqi.map_or(true, |current| aqi > current) {
          obs.aqi = Some(aqi);
        }
      }
    }
  }
}

/// Composite asthma risk index derived from AQI, on a 0-100 scale
pub fn asthma_index_from_aqi(aqi: f64) -> f64 {
  if aqi <= 50.0 {
    aqi * 0.6
  } else if aqi <= 100.0 {
    30.0 + (aqi - 50.0) * 0.8
  } else if aqi <= 150.0 {
    70.0 + (aqi - 100.0) * 0.6
  } else {
    100.0
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
