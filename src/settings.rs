//! Provider configuration
//!
//! API keys are injected configuration, never hard-coded fallbacks. A missing
//! key disables that provider, which downstream code treats as an explicit
//! "no data" state rather than a silent fallback to a shared credential.

use std::env;

const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_AIR_QUALITY_BASE_URL: &str = "https://www.airnowapi.org/aq";

/// Configuration for the external weather / air-quality providers.
///
/// Base URLs are part of the config so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
  pub weather_api_key: Option<String>,
  pub air_quality_api_key: Option<String>,
  pub weather_base_url: String,
  pub air_quality_base_url: String,
}

impl Default for ProviderConfig {
  fn default() -> Self {
    Self {
      weather_api_key: None,
      air_quality_api_key: None,
      weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
      air_quality_base_url: DEFAULT_AIR_QUALITY_BASE_URL.to_string(),
    }
  }
}

impl ProviderConfig {
  /// Load configuration from the environment (reads .env first if present)
  pub fn from_env() -> Self {
    dotenvy::dotenv().ok();

    Self {
      weather_api_key: env::var("OPENWEATHER_API_KEY").ok().filter(|k| !k.is_empty()),
      air_quality_api_key: env::var("AIRNOW_API_KEY").ok().filter(|k| !k.is_empty()),
      weather_base_url: env::var("OPENWEATHER_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_WEATHER_BASE_URL.to_string()),
      air_quality_base_url: env::var("AIRNOW_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_AIR_QUALITY_BASE_URL.to_string()),
    }
  }

  /// Config with no providers enabled (every live fetch returns "no data")
  pub fn disabled() -> Self {
    Self::default()
  }
}
