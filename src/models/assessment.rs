use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered advisory category derived from the final risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
  Safe,     // score <= 30
  Moderate, // score <= 50
  Caution,  // score <= 70
  Avoid,    // score > 70
}

impl RecommendationLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      RecommendationLevel::Safe => "safe",
      RecommendationLevel::Moderate => "moderate",
      RecommendationLevel::Caution => "caution",
      RecommendationLevel::Avoid => "avoid",
    }
  }
}

/// Exercise advice on tighter thresholds than the overall category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseRecommendation {
  Safe,     // score <= 40
  Moderate, // score <= 70
  Avoid,    // score > 70
}

impl ExerciseRecommendation {
  pub fn as_str(&self) -> &'static str {
    match self {
      ExerciseRecommendation::Safe => "safe",
      ExerciseRecommendation::Moderate => "moderate",
      ExerciseRecommendation::Avoid => "avoid",
    }
  }
}

/// The engine's output record. Created fresh on every request and immutable
/// once returned; persistence (if any) is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
  pub zip_code: String,
  pub date: NaiveDate,
  pub recommendation_level: RecommendationLevel,
  /// Final personalized score, rounded to a whole number for display
  pub risk_score: i64,
  pub air_quality_score: i64,
  pub weather_score: i64,
  pub pollen_score: i64,
  pub overall_message: String,
  pub air_quality_message: String,
  pub weather_message: String,
  pub pollen_message: String,
  pub general_advice: String,
  /// One of 'morning', 'afternoon', 'evening', 'early morning'
  pub best_time_of_day: String,
  pub outdoor_activity_safe: bool,
  pub exercise_recommendation: ExerciseRecommendation,
}
