// Core matching logic exports
pub mod ledger;
pub mod pairing;
pub mod scheduler;

pub use ledger::{LedgerError, RatingLedger};
pub use pairing::{assign_round, PairingHistory, RoundAssignment};
pub use scheduler::{RotationScheduler, SchedulerError, SchedulerState};
