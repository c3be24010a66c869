use crate::models::domain::{MutualMatch, Pair, Participant, Rating};
use serde::{Deserialize, Serialize};

/// Snapshot of one round's assignment, returned by start and rotate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResponse {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "roundNumber")]
    pub round_number: u32,
    #[serde(rename = "startedAt")]
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "roundDurationSecs")]
    pub round_duration_secs: u64,
    pub pairs: Vec<Pair>,
    pub waiting: Vec<Participant>,
}

/// One participant's view of the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerResponse {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "participantId")]
    pub participant_id: String,
    #[serde(rename = "roundNumber")]
    pub round_number: u32,
    pub partner: Option<Participant>,
    pub waiting: bool,
}

/// Per-pair rating progress totals for the operator dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingProgress {
    pub both: usize,
    pub partial: usize,
    pub none: usize,
}

/// Operator-facing session overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "roundNumber")]
    pub round_number: u32,
    #[serde(rename = "elapsedSecs")]
    pub elapsed_secs: u64,
    #[serde(rename = "roundDurationSecs")]
    pub round_duration_secs: u64,
    #[serde(rename = "activePairs")]
    pub active_pairs: usize,
    #[serde(rename = "waitingCount")]
    pub waiting_count: usize,
    #[serde(rename = "ratingProgress")]
    pub rating_progress: RatingProgress,
}

/// Response for ending a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndedResponse {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "roundsCompleted")]
    pub rounds_completed: u32,
}

/// Mutual matches for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub matches: Vec<MutualMatch>,
    pub count: usize,
}

/// Ratings recorded for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsResponse {
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub ratings: Vec<Rating>,
    pub count: usize,
}

/// Acknowledgement for a submitted rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingResponse {
    pub success: bool,
    #[serde(rename = "ratingId")]
    pub rating_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
