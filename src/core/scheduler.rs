use crate::core::pairing::{assign_round, PairingHistory, RoundAssignment};
use crate::models::Participant;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by the rotation state machine
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid scheduler state: {0}")]
    InvalidState(String),
}

/// Lifecycle of a matching session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RoundActive,
    Ended,
}

/// Stateful controller for one event's pairing rounds.
///
/// Owns the participant pool, the monotonically increasing round counter,
/// the current assignment, and the pairing history fed to the algorithm.
/// Rotation is operator-triggered; the configured round duration is
/// advisory and never gates a transition.
#[derive(Debug)]
pub struct RotationScheduler {
    state: SchedulerState,
    pool: Vec<Participant>,
    round: u32,
    round_started_at: Option<DateTime<Utc>>,
    round_duration_secs: u64,
    history: PairingHistory,
    current: RoundAssignment,
}

impl RotationScheduler {
    pub fn new(round_duration_secs: u64) -> Self {
        Self {
            state: SchedulerState::Idle,
            pool: Vec::new(),
            round: 0,
            round_started_at: None,
            round_duration_secs,
            history: PairingHistory::default(),
            current: RoundAssignment::default(),
        }
    }

    /// Begin round 1 with a freshly loaded pool. Valid from Idle, or
    /// from Ended to run another session for the same event.
    pub fn start(&mut self, pool: Vec<Participant>) -> Result<&RoundAssignment, SchedulerError> {
        if self.state == SchedulerState::RoundActive {
            return Err(SchedulerError::InvalidState(
                "session already started".to_string(),
            ));
        }

        self.pool = pool;
        self.round = 1;
        self.history = PairingHistory::default();
        self.current = assign_round(&self.pool, self.round, &self.history, Utc::now());
        self.history.record(&self.current);
        self.round_started_at = Some(Utc::now());
        self.state = SchedulerState::RoundActive;

        tracing::info!(
            "Session started: {} pairs, {} waiting",
            self.current.pairs.len(),
            self.current.waiting.len()
        );

        Ok(&self.current)
    }

    /// Dissolve the current pairs and form the next round's. The old
    /// assignment is replaced wholesale, never mutated in place.
    pub fn rotate(&mut self) -> Result<&RoundAssignment, SchedulerError> {
        if self.state != SchedulerState::RoundActive {
            return Err(SchedulerError::InvalidState(
                "cannot rotate before the session is started".to_string(),
            ));
        }

        self.round += 1;
        self.current = assign_round(&self.pool, self.round, &self.history, Utc::now());
        self.history.record(&self.current);
        self.round_started_at = Some(Utc::now());

        tracing::info!(
            "Rotated to round {}: {} pairs, {} waiting",
            self.round,
            self.current.pairs.len(),
            self.current.waiting.len()
        );

        Ok(&self.current)
    }

    /// Finish the session, discarding live pairing state. Returns the
    /// number of rounds completed. Ratings live in the ledger and are
    /// unaffected.
    pub fn end(&mut self) -> Result<u32, SchedulerError> {
        if self.state != SchedulerState::RoundActive {
            return Err(SchedulerError::InvalidState(
                "cannot end a session that is not running".to_string(),
            ));
        }

        let rounds = self.round;
        self.current = RoundAssignment::default();
        self.round_started_at = None;
        self.state = SchedulerState::Ended;

        tracing::info!("Session ended after {} rounds", rounds);

        Ok(rounds)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn round_started_at(&self) -> Option<DateTime<Utc>> {
        self.round_started_at
    }

    /// Seconds since the current round began; zero outside a round.
    /// Display-only, never enforced.
    pub fn elapsed_secs(&self) -> u64 {
        self.round_started_at
            .map(|t| (Utc::now() - t).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    pub fn round_duration_secs(&self) -> u64 {
        self.round_duration_secs
    }

    pub fn current(&self) -> &RoundAssignment {
        &self.current
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    pub fn in_pool(&self, participant_id: &str) -> bool {
        self.pool.iter().any(|p| p.id == participant_id)
    }
}
