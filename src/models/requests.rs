use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to submit a rating for a partner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "event_id", rename = "eventId")]
    pub event_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "rater_id", rename = "raterId")]
    pub rater_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "ratee_id", rename = "rateeId")]
    pub ratee_id: String,
    #[serde(alias = "rating", rename = "rating")]
    pub rating: String,
    #[serde(default)]
    pub notes: Option<String>,
}
