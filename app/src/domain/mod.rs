//! Domain primitives, aggregates, and driving services.
//!
//! Purpose: define the strongly typed session model behind the FitCoin
//! screens. Keep entities immutable, document invariants and serialisation
//! contracts (serde) in each type's Rustdoc, and route every mutation
//! through [`SessionService`] transactions.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error payload and taxonomy.
//! - User — wallet-derived identity with validated components.
//! - CoinLedger — coin balance with earned/spent running totals.
//! - ActivityRecord — immutable finalized activity entry.
//! - ActivityTracker — Idle/Tracking accrual state machine.
//! - SessionService — the single writer over the session snapshot.

pub mod activities;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod session;
pub mod tracker;
pub mod user;

pub use self::activities::{
    ActivityRecord, ActivityRecordDraft, ActivityType, ActivityValidationError, coins_for_calories,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger::{CoinLedger, LedgerError};
pub use self::session::{
    Achievement, LifetimeStats, SessionService, SessionSnapshot, TodaySummary,
};
pub use self::tracker::{
    ActivitySample, ActivityTracker, CalorieSampler, TickSleeper, TrackerConfig, TrackerError,
    TrackerProgress,
};
pub use self::user::{
    FitnessGoal, User, UserDraft, UserId, UserValidationError, Username, WalletAddress,
};

/// Convenient session-transaction result alias.
pub type SessionResult<T> = Result<T, Error>;
