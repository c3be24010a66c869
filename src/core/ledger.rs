use crate::models::{MutualMatch, Rating, RatingStatus, RatingValue};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised at the ledger boundary
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid participant: {0}")]
    InvalidParticipant(String),
}

type RatingKey = (String, String, String);

/// Append/overwrite store of per-partner interest ratings, and the
/// source mutual matches are derived from.
///
/// Keys are the ordered (event, rater, ratee) triple, so writes from
/// different raters never touch the same entry and resubmission
/// overwrites rather than appends. Reads run concurrently with writes
/// and may be slightly stale; matches are revealed after the event, so
/// that is acceptable.
#[derive(Debug, Default)]
pub struct RatingLedger {
    ratings: RwLock<HashMap<RatingKey, Rating>>,
}

impl RatingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert one rating. Self-rating is rejected.
    pub async fn submit(&self, rating: Rating) -> Result<(), LedgerError> {
        if rating.rater_id == rating.ratee_id {
            return Err(LedgerError::InvalidParticipant(format!(
                "participant {} cannot rate themselves",
                rating.rater_id
            )));
        }

        let key = (
            rating.event_id.clone(),
            rating.rater_id.clone(),
            rating.ratee_id.clone(),
        );

        let mut ratings = self.ratings.write().await;
        ratings.insert(key, rating);
        Ok(())
    }

    pub async fn get(&self, event_id: &str, rater_id: &str, ratee_id: &str) -> Option<Rating> {
        let ratings = self.ratings.read().await;
        ratings
            .get(&(
                event_id.to_string(),
                rater_id.to_string(),
                ratee_id.to_string(),
            ))
            .cloned()
    }

    /// True iff both directions were rated `interested`. Symmetric in
    /// its id arguments by construction.
    pub async fn is_mutual_match(&self, a: &str, b: &str, event_id: &str) -> bool {
        let ratings = self.ratings.read().await;
        Self::rated_interested(&ratings, event_id, a, b)
            && Self::rated_interested(&ratings, event_id, b, a)
    }

    /// Rating progress for a pair, any value counting. Drives the
    /// operator's live progress display.
    pub async fn rating_status(&self, a: &str, b: &str, event_id: &str) -> RatingStatus {
        let ratings = self.ratings.read().await;
        let a_rated = ratings.contains_key(&(
            event_id.to_string(),
            a.to_string(),
            b.to_string(),
        ));
        let b_rated = ratings.contains_key(&(
            event_id.to_string(),
            b.to_string(),
            a.to_string(),
        ));

        match (a_rated, b_rated) {
            (true, true) => RatingStatus::Both,
            (false, false) => RatingStatus::None,
            _ => RatingStatus::Partial,
        }
    }

    /// All mutual matches for an event, each unordered pair reported
    /// once even though two ordered ratings underlie it.
    pub async fn matches_for_event(&self, event_id: &str) -> Vec<MutualMatch> {
        let ratings = self.ratings.read().await;
        let mut checked = HashSet::new();
        let mut matches = Vec::new();

        for ((event, rater, ratee), rating) in ratings.iter() {
            if event != event_id || rating.rating != RatingValue::Interested {
                continue;
            }
            let candidate = MutualMatch::new(rater, ratee);
            if !checked.insert((candidate.participant_a.clone(), candidate.participant_b.clone()))
            {
                continue;
            }
            if Self::rated_interested(&ratings, event_id, ratee, rater) {
                matches.push(candidate);
            }
        }

        matches.sort_by(|a, b| {
            (&a.participant_a, &a.participant_b).cmp(&(&b.participant_a, &b.participant_b))
        });
        matches
    }

    /// Every rating recorded for an event, for the operator progress board
    pub async fn ratings_for_event(&self, event_id: &str) -> Vec<Rating> {
        let ratings = self.ratings.read().await;
        let mut result: Vec<Rating> = ratings
            .iter()
            .filter(|((event, _, _), _)| event == event_id)
            .map(|(_, r)| r.clone())
            .collect();
        result.sort_by(|a, b| {
            (&a.rater_id, &a.ratee_id).cmp(&(&b.rater_id, &b.ratee_id))
        });
        result
    }

    /// Ratings one participant has submitted within an event
    pub async fn ratings_by(&self, rater_id: &str, event_id: &str) -> Vec<Rating> {
        let ratings = self.ratings.read().await;
        let mut result: Vec<Rating> = ratings
            .iter()
            .filter(|((event, rater, _), _)| event == event_id && rater == rater_id)
            .map(|(_, r)| r.clone())
            .collect();
        result.sort_by(|a, b| a.ratee_id.cmp(&b.ratee_id));
        result
    }

    fn rated_interested(
        ratings: &HashMap<RatingKey, Rating>,
        event_id: &str,
        rater: &str,
        ratee: &str,
    ) -> bool {
        ratings
            .get(&(
                event_id.to_string(),
                rater.to_string(),
                ratee.to_string(),
            ))
            .map(|r| r.rating == RatingValue::Interested)
            .unwrap_or(false)
    }
}
