// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    EventRecord, EventStatus, MutualMatch, Pair, Participant, Rating, RatingStatus, RatingValue,
};
pub use requests::SubmitRatingRequest;
pub use responses::{
    ErrorResponse, HealthResponse, MatchesResponse, PartnerResponse, ProgressResponse,
    RatingProgress, RatingsResponse, RoundResponse, SessionEndedResponse, SubmitRatingResponse,
};
