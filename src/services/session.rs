use crate::core::{LedgerError, RatingLedger, RotationScheduler, SchedulerError, SchedulerState};
use crate::models::{
    EventStatus, MatchesResponse, PartnerResponse, ProgressResponse, Rating, RatingProgress,
    RatingStatus, RatingValue, RatingsResponse, RoundResponse, SessionEndedResponse,
};
use crate::services::events::{EventStoreClient, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Errors surfaced by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session state: {0}")]
    InvalidState(String),

    #[error("invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("event store unavailable: {0}")]
    CollaboratorUnavailable(#[from] StoreError),
}

impl From<SchedulerError> for SessionError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::InvalidState(msg) => SessionError::InvalidState(msg),
        }
    }
}

impl From<LedgerError> for SessionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidParticipant(msg) => SessionError::InvalidParticipant(msg),
        }
    }
}

/// Orchestrates live matching sessions against the external event store.
///
/// All collaborators arrive at construction time. Each event's scheduler
/// sits behind its own mutex so concurrent operator actions on one
/// session serialize (two "Rotate" clicks cannot double-advance the
/// round), while different events proceed independently. Pairing state
/// is in-memory for the session's lifetime; only ratings outlive it.
pub struct SessionCoordinator {
    store: Arc<EventStoreClient>,
    ledger: Arc<RatingLedger>,
    round_duration_secs: u64,
    sessions: RwLock<HashMap<String, Arc<Mutex<RotationScheduler>>>>,
}

impl SessionCoordinator {
    pub fn new(
        store: Arc<EventStoreClient>,
        ledger: Arc<RatingLedger>,
        round_duration_secs: u64,
    ) -> Self {
        Self {
            store,
            ledger,
            round_duration_secs,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session for an active event: load the checked-in pool and
    /// run round 1. The event must be `active` in the store, and any
    /// previous session for it must have ended.
    pub async fn start_session(&self, event_id: &str) -> Result<RoundResponse, SessionError> {
        let event = self.store.get_event(event_id).await?;
        if event.status != EventStatus::Active {
            return Err(SessionError::InvalidState(format!(
                "event {} is not active",
                event_id
            )));
        }

        let pool = self.store.list_checked_in(event_id).await?;
        tracing::info!(
            "Starting session for event {} with {} checked-in participants",
            event_id,
            pool.len()
        );

        let session = {
            let mut sessions = self.sessions.write().await;
            sessions
                .entry(event_id.to_string())
                .or_insert_with(|| {
                    Arc::new(Mutex::new(RotationScheduler::new(self.round_duration_secs)))
                })
                .clone()
        };

        let mut scheduler = session.lock().await;
        scheduler.start(pool)?;
        Ok(Self::round_response(event_id, &scheduler))
    }

    /// Dissolve the current pairs and form the next round's
    pub async fn rotate_partners(&self, event_id: &str) -> Result<RoundResponse, SessionError> {
        let session = self.session(event_id).await?;
        let mut scheduler = session.lock().await;
        scheduler.rotate()?;
        Ok(Self::round_response(event_id, &scheduler))
    }

    /// End the session; ratings stay queryable afterward
    pub async fn end_session(&self, event_id: &str) -> Result<SessionEndedResponse, SessionError> {
        let session = self.session(event_id).await?;
        let mut scheduler = session.lock().await;
        let rounds_completed = scheduler.end()?;
        Ok(SessionEndedResponse {
            event_id: event_id.to_string(),
            rounds_completed,
        })
    }

    /// Snapshot of the current round's full assignment
    pub async fn current_round(&self, event_id: &str) -> Result<RoundResponse, SessionError> {
        let session = self.session(event_id).await?;
        let scheduler = session.lock().await;
        if scheduler.state() != SchedulerState::RoundActive {
            return Err(SessionError::InvalidState(format!(
                "no active round for event {}",
                event_id
            )));
        }
        Ok(Self::round_response(event_id, &scheduler))
    }

    /// One participant's current partner, or waiting status
    pub async fn current_pairing_for(
        &self,
        event_id: &str,
        participant_id: &str,
    ) -> Result<PartnerResponse, SessionError> {
        let session = self.session(event_id).await?;
        let scheduler = session.lock().await;
        if scheduler.state() != SchedulerState::RoundActive {
            return Err(SessionError::InvalidState(format!(
                "no active round for event {}",
                event_id
            )));
        }
        if !scheduler.in_pool(participant_id) {
            return Err(SessionError::InvalidParticipant(format!(
                "participant {} is not checked in for event {}",
                participant_id, event_id
            )));
        }

        let partner = scheduler.current().partner_of(participant_id).cloned();
        let waiting = partner.is_none();
        Ok(PartnerResponse {
            event_id: event_id.to_string(),
            participant_id: participant_id.to_string(),
            round_number: scheduler.round(),
            partner,
            waiting,
        })
    }

    /// Operator overview: round, elapsed time, pair/waiting counts, and
    /// per-pair rating progress
    pub async fn progress_summary(&self, event_id: &str) -> Result<ProgressResponse, SessionError> {
        let session = self.session(event_id).await?;
        let scheduler = session.lock().await;
        if scheduler.state() != SchedulerState::RoundActive {
            return Err(SessionError::InvalidState(format!(
                "no active round for event {}",
                event_id
            )));
        }

        let mut progress = RatingProgress::default();
        for pair in &scheduler.current().pairs {
            match self
                .ledger
                .rating_status(&pair.left.id, &pair.right.id, event_id)
                .await
            {
                RatingStatus::Both => progress.both += 1,
                RatingStatus::Partial => progress.partial += 1,
                RatingStatus::None => progress.none += 1,
            }
        }

        Ok(ProgressResponse {
            event_id: event_id.to_string(),
            round_number: scheduler.round(),
            elapsed_secs: scheduler.elapsed_secs(),
            round_duration_secs: scheduler.round_duration_secs(),
            active_pairs: scheduler.current().pairs.len(),
            waiting_count: scheduler.current().waiting.len(),
            rating_progress: progress,
        })
    }

    /// Record a participant's rating of a partner. When a session exists
    /// for the event, both sides must be in its checked-in pool.
    pub async fn submit_rating(
        &self,
        event_id: &str,
        rater_id: &str,
        ratee_id: &str,
        rating: RatingValue,
        notes: Option<String>,
    ) -> Result<(), SessionError> {
        let session = {
            let sessions = self.sessions.read().await;
            sessions.get(event_id).cloned()
        };

        if let Some(session) = session {
            let scheduler = session.lock().await;
            for id in [rater_id, ratee_id] {
                if !scheduler.in_pool(id) {
                    return Err(SessionError::InvalidParticipant(format!(
                        "participant {} is not checked in for event {}",
                        id, event_id
                    )));
                }
            }
        }

        self.ledger
            .submit(Rating {
                rater_id: rater_id.to_string(),
                ratee_id: ratee_id.to_string(),
                event_id: event_id.to_string(),
                rating,
                notes,
                created_at: chrono::Utc::now(),
            })
            .await?;

        tracing::debug!("Recorded rating: {} -> {} ({:?})", rater_id, ratee_id, rating);
        Ok(())
    }

    /// Mutual matches derived from the ledger; works after the session ends
    pub async fn matches_for_event(&self, event_id: &str) -> MatchesResponse {
        let matches = self.ledger.matches_for_event(event_id).await;
        MatchesResponse {
            event_id: event_id.to_string(),
            count: matches.len(),
            matches,
        }
    }

    /// All recorded ratings for the operator's progress board
    pub async fn ratings_for_event(&self, event_id: &str) -> RatingsResponse {
        let ratings = self.ledger.ratings_for_event(event_id).await;
        RatingsResponse {
            event_id: event_id.to_string(),
            count: ratings.len(),
            ratings,
        }
    }

    async fn session(
        &self,
        event_id: &str,
    ) -> Result<Arc<Mutex<RotationScheduler>>, SessionError> {
        let sessions = self.sessions.read().await;
        sessions.get(event_id).cloned().ok_or_else(|| {
            SessionError::InvalidState(format!("no session for event {}", event_id))
        })
    }

    fn round_response(event_id: &str, scheduler: &RotationScheduler) -> RoundResponse {
        RoundResponse {
            event_id: event_id.to_string(),
            round_number: scheduler.round(),
            started_at: scheduler.round_started_at().unwrap_or_else(chrono::Utc::now),
            round_duration_secs: scheduler.round_duration_secs(),
            pairs: scheduler.current().pairs.clone(),
            waiting: scheduler.current().waiting.clone(),
        }
    }
}
