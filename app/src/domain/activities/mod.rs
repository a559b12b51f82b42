//! Activity record domain types.
//!
//! Finalized activities are immutable entries in an ordered history; the
//! append order is the chronological order. Records carry the coins the
//! chain granted for them and enforce the conversion policy at construction
//! so a persisted history can never disagree with the ledger.

use std::fmt;

mod record;
#[cfg(test)]
mod tests;

pub use record::{ActivityRecord, ActivityRecordDraft, ActivityType, ParseActivityTypeError};

/// Coins granted for a calorie amount: `floor(calories * 0.1)`.
///
/// The single conversion policy shared by the simulated chain, the live
/// tracker preview, and record validation.
///
/// # Examples
///
/// ```
/// use fitcoin_app::domain::coins_for_calories;
///
/// assert_eq!(coins_for_calories(40.0), 4);
/// assert_eq!(coins_for_calories(9.9), 0);
/// ```
pub fn coins_for_calories(calories: f64) -> u64 {
    if !calories.is_finite() || calories <= 0.0 {
        return 0;
    }
    (calories * 0.1).floor() as u64
}

/// Validation errors raised by activity record constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    NilRecordId,
    ConversionPolicyViolation {
        calories_burned: u32,
        coins_earned: u64,
    },
}

impl fmt::Display for ActivityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NilRecordId => write!(f, "activity record id must not be nil"),
            Self::ConversionPolicyViolation {
                calories_burned,
                coins_earned,
            } => write!(
                f,
                "activity coins {coins_earned} do not match one tenth of {calories_burned} calories"
            ),
        }
    }
}

impl std::error::Error for ActivityValidationError {}
