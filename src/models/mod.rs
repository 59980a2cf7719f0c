pub mod assessment;
pub mod observation;
pub mod profile;

pub use assessment::{ExerciseRecommendation, RecommendationLevel, RiskAssessment};
pub use observation::{Metric, Observation};
pub use profile::UserHealthProfile;
