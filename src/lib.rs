//! EarthBreath predictive risk and recommendation engine
//!
//! Turns per-location environmental history into daily asthma risk
//! assessments: trend and seasonality analysis over stored observations,
//! short-range air-quality forecasting, base risk scoring with a
//! deterministic perturbation, profile-driven personalization, and the
//! final recommendation classification.

pub mod baseline;
pub mod climate;
pub mod collector;
pub mod db;
pub mod error;
pub mod forecast;
pub mod history;
pub mod models;
pub mod personalization;
pub mod provider;
pub mod recommendation;
pub mod risk;
pub mod settings;

#[cfg(test)]
pub mod test_utils;

pub use db::{connect, DbPool};
pub use error::EngineError;
pub use models::{
  ExerciseRecommendation, Metric, Observation, RecommendationLevel, RiskAssessment,
  UserHealthProfile,
};
pub use recommendation::RecommendationService;
pub use settings::ProviderConfig;
