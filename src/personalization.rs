//! Personalization multiplier chain
//!
//! Four independent multiplicative adjustments derived from the health
//! questionnaire. Absent or unrecognized attributes are neutral (1.0), so a
//! missing profile leaves the base score untouched.

use crate::models::{Metric, Observation, UserHealthProfile};

/// Cumulative trigger-sensitivity cap; bounds worst-case amplification no
/// matter how many triggers match
const TRIGGER_SENSITIVITY_CAP: f64 = 2.0;

fn severity_multiplier(asthma_severity: Option<&str>) -> f64 {
  match asthma_severity {
    Some("mild") => 0.8,
    Some("moderate") => 1.0,
    Some("severe") => 1.5,
    _ => 1.0,
  }
}

fn control_multiplier(asthma_control: Option<&str>) -> f64 {
  match asthma_control {
    Some("well-controlled") => 0.9,
    Some("partially-controlled") => 1.1,
    Some("poorly-controlled") => 1.3,
    _ => 1.0,
  }
}

fn symptom_frequency_multiplier(symptom_frequency: Option<&str>) -> f64 {
  match symptom_frequency {
    Some("daily") => 1.4,
    Some("weekly") => 1.2,
    Some("monthly") => 1.0,
    Some("rarely") => 0.9,
    _ => 1.0,
  }
}

/// One trigger category: the tag fragments that match it, the reading it
/// watches, and the per-category amplification when the threshold is crossed
struct TriggerCategory {
  tags: &'static [&'static str],
  metric: Metric,
  multiplier: f64,
  crossed: fn(f64) -> bool,
}

const TRIGGER_CATEGORIES: &[TriggerCategory] = &[
  TriggerCategory {
    tags: &["pollen"],
    metric: Metric::Pollen,
    multiplier: 1.3,
    crossed: |v| v > 50.0,
  },
  TriggerCategory {
    tags: &["air_quality", "air quality"],
    metric: Metric::Aqi,
    multiplier: 1.2,
    crossed: |v| v > 50.0,
  },
  TriggerCategory {
    tags: &["cold_air", "cold air"],
    metric: Metric::Temperature,
    multiplier: 1.2,
    crossed: |v| v < 10.0,
  },
  TriggerCategory {
    tags: &["humidity"],
    metric: Metric::Humidity,
    multiplier: 1.15,
    crossed: |v| v > 70.0,
  },
  TriggerCategory {
    tags: &["wind"],
    metric: Metric::WindSpeed,
    multiplier: 1.1,
    crossed: |v| v > 10.0,
  },
  TriggerCategory {
    tags: &["pollution"],
    metric: Metric::Pm25,
    multiplier: 1.25,
    crossed: |v| v > 25.0,
  },
  TriggerCategory {
    tags: &["ozone"],
    metric: Metric::O3,
    multiplier: 1.2,
    crossed: |v| v > 0.06,
  },
];

/// Cumulative sensitivity for the user's declared triggers against today's
/// readings. Each matched category whose threshold is crossed multiplies in
/// once; the product is capped at 2.0.
fn trigger_sensitivity(profile: &UserHealthProfile, today: &Observation) -> f64 {
  let triggers = profile.triggers();
  if triggers.is_empty() {
    return 1.0;
  }

  let mut sensitivity = 1.0;

  for trigger in &triggers {
    for category in TRIGGER_CATEGORIES {
      if !category.tags.iter().any(|tag| trigger.contains(tag)) {
        continue;
      }
      // Unobserved readings cannot confirm a trigger
      if let Some(value) = today.metric(category.metric) {
        if (category.crossed)(value) {
          sensitivity *= category.multiplier;
        }
      }
    }
  }

  sensitivity.min(TRIGGER_SENSITIVITY_CAP)
}

/// Apply the full multiplier chain to a base score.
///
/// Guarantee: a neutral or absent profile returns the base score exactly
/// (modulo the one-decimal rounding). Intermediate products may exceed 100;
/// the final clamp keeps the displayed scale intact.
pub fn personalize_risk_score(
  base_risk_score: f64,
  profile: Option<&UserHealthProfile>,
  today: &Observation,
) -> f64 {
  let Some(profile) = profile else {
    return base_risk_score;
  };

  let mut personalized = base_risk_score;
  personalized *= severity_multiplier(profile.asthma_severity.as_deref());
  personalized *= control_multiplier(profile.asthma_control.as_deref());
  personalized *= symptom_frequency_multiplier(profile.symptom_frequency.as_deref());
  personalized *= trigger_sensitivity(profile, today);

  (personalized.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
