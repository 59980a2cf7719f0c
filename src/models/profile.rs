use serde::{Deserialize, Serialize};

/// Read-only snapshot of a user's asthma questionnaire.
///
/// Owned by user management; this engine only reads it. All fields are
/// optional free-text from the questionnaire, so every consumer must
/// tolerate absent or unrecognized values (they map to neutral behavior).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserHealthProfile {
  /// 'mild', 'moderate', 'severe'
  pub asthma_severity: Option<String>,
  /// 'well-controlled', 'partially-controlled', 'poorly-controlled'
  pub asthma_control: Option<String>,
  /// 'daily', 'weekly', 'monthly', 'rarely'
  pub symptom_frequency: Option<String>,
  /// JSON array of trigger tags, e.g. `["pollen", "cold air"]`
  pub trigger_factors: Option<String>,
}

impl UserHealthProfile {
  /// Parse the trigger-factor JSON into a list of lowercase tags.
  ///
  /// Malformed JSON or a non-array payload is treated as "no triggers
  /// declared", never surfaced as an error.
  pub fn triggers(&self) -> Vec<String> {
    let Some(raw) = self.trigger_factors.as_deref() else {
      return vec![];
    };

    match serde_json::from_str::<Vec<String>>(raw) {
      Ok(tags) => tags.into_iter().map(|t| t.to_lowercase()).collect(),
      Err(_) => vec![],
    }
  }
}
