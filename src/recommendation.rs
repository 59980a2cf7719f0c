//! Recommendation classification and the end-to-end assessment pipeline
//!
//! The classifier is a stateless pure mapping from score to advisory
//! category; `RecommendationService` wires snapshot assembly, base scoring,
//! personalization, and classification into one `RiskAssessment`.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::climate::ClimateDataService;
use crate::db::DbPool;
use crate::models::{
  ExerciseRecommendation, Metric, Observation, RecommendationLevel, RiskAssessment,
  UserHealthProfile,
};
use crate::personalization::personalize_risk_score;
use crate::risk::{air_quality_score, base_risk_score, perturbation_seed, pollen_score, weather_score};
use crate::settings::ProviderConfig;

/// Fixed 4-slot cycle for the best-time-of-day suggestion, indexed by
/// day offset modulo 4
const TIME_OPTIONS: [&str; 4] = ["morning", "afternoon", "evening", "early morning"];

/// ---------------------------------------------------------------------------
/// Recommendation Classifier
/// ---------------------------------------------------------------------------

/// Map a final score to its advisory category. Boundaries are fixed; any
/// change to the base scorer's scale must be re-validated against them.
pub fn classify(risk_score: f64) -> RecommendationLevel {
  if risk_score <= 30.0 {
    RecommendationLevel::Safe
  } else if risk_score <= 50.0 {
    RecommendationLevel::Moderate
  } else if risk_score <= 70.0 {
    RecommendationLevel::Caution
  } else {
    RecommendationLevel::Avoid
  }
}

/// Fixed advisory message per category
pub fn general_advice(level: RecommendationLevel) -> &'static str {
  match level {
    RecommendationLevel::Safe => {
      "Excellent conditions for outdoor activities. Perfect day to enjoy fresh air and exercise safely."
    }
    RecommendationLevel::Moderate => {
      "Good conditions for most outdoor activities. Monitor your symptoms and enjoy your day!"
    }
    RecommendationLevel::Caution => {
      "Moderate risk conditions. Consider limiting prolonged outdoor activities during peak hours. Monitor air quality and carry your inhaler."
    }
    RecommendationLevel::Avoid => {
      "High risk conditions. Limit outdoor activities, especially during peak hours. Stay indoors when possible and keep your inhaler close."
    }
  }
}

pub fn exercise_recommendation(risk_score: f64) -> ExerciseRecommendation {
  if risk_score <= 40.0 {
    ExerciseRecommendation::Safe
  } else if risk_score <= 70.0 {
    ExerciseRecommendation::Moderate
  } else {
    ExerciseRecommendation::Avoid
  }
}

/// ---------------------------------------------------------------------------
/// Assessment Pipeline
/// ---------------------------------------------------------------------------

pub struct RecommendationService {
  climate: ClimateDataService,
}

impl RecommendationService {
  pub fn new(config: ProviderConfig) -> Self {
    Self {
      climate: ClimateDataService::new(config),
    }
  }

  /// Produce a risk assessment for one (zip, date).
  ///
  /// Idempotent: the perturbation seed derives from (zip, target_date), so
  /// identical inputs always yield an identical assessment.
  pub async fn assess(
    &self,
    pool: &DbPool,
    zip_code: &str,
    today: NaiveDate,
    target_date: NaiveDate,
    profile: Option<&UserHealthProfile>,
  ) -> RiskAssessment {
    let day_offset = (target_date - today).num_days();

    let conditions = self
      .climate
      .snapshot_with_forecast(pool, zip_code, today, target_date)
      .await;

    let mut rng = StdRng::seed_from_u64(perturbation_seed(zip_code, target_date));
    let base = base_risk_score(&conditions, target_date, day_offset, &mut rng);
    let personalized = personalize_risk_score(base, profile, &conditions);

    if profile.is_some() {
      tracing::info!(
        "Personalized risk score for {}: {:.1} -> {:.1}",
        zip_code,
        base,
        personalized
      );
    }

    build_assessment(zip_code, target_date, day_offset, &conditions, personalized)
  }
}

/// Assemble the output record from the final score and the day's conditions
pub fn build_assessment(
  zip_code: &str,
  target_date: NaiveDate,
  day_offset: i64,
  conditions: &Observation,
  final_score: f64,
) -> RiskAssessment {
  let level = classify(final_score);
  let risk_score = final_score.round() as i64;

  let temperature = conditions.metric_or_default(Metric::Temperature);
  let humidity = conditions.metric_or_default(Metric::Humidity);
  let pollen = conditions.metric_or_default(Metric::Pollen);

  let date_str = target_date.format("%B %d").to_string();
  let level_word = if level == RecommendationLevel::Safe {
    "favorable"
  } else {
    level.as_str()
  };

  RiskAssessment {
    zip_code: zip_code.to_string(),
    date: target_date,
    recommendation_level: level,
    risk_score,
    air_quality_score: air_quality_score(conditions).round() as i64,
    weather_score: weather_score(conditions).round() as i64,
    pollen_score: pollen_score(conditions).round() as i64,
    overall_message: format!(
      "Risk assessment for {} in zip code {} indicates {} conditions with a risk score of {}/100.",
      date_str,
      zip_code,
      level.as_str(),
      risk_score
    ),
    air_quality_message: format!(
      "Risk score of {}/100 indicates {} conditions for asthma patients.",
      risk_score, level_word
    ),
    weather_message: format!(
      "Temperature will be around {:.1}\u{b0}C with {:.0}% humidity.",
      temperature, humidity
    ),
    pollen_message: format!(
      "Pollen count is around {:.0}; sensitive individuals should plan around it.",
      pollen
    ),
    general_advice: general_advice(level).to_string(),
    best_time_of_day: TIME_OPTIONS[day_offset.rem_euclid(4) as usize].to_string(),
    outdoor_activity_safe: risk_score <= 70,
    exercise_recommendation: exercise_recommendation(risk_score as f64),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
