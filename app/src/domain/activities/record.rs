//! Activity record entity and constructors.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

use super::ActivityValidationError;

/// Activity categories the tracker can finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Walking,
    Running,
    Cycling,
    Workout,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walking => f.write_str("walking"),
            Self::Running => f.write_str("running"),
            Self::Cycling => f.write_str("cycling"),
            Self::Workout => f.write_str("workout"),
        }
    }
}

/// Error returned when parsing an activity type from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseActivityTypeError;

impl fmt::Display for ParseActivityTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid activity type")
    }
}

impl std::error::Error for ParseActivityTypeError {}

impl FromStr for ActivityType {
    type Err = ParseActivityTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "walking" => Ok(Self::Walking),
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            "workout" => Ok(Self::Workout),
            _ => Err(ParseActivityTypeError),
        }
    }
}

/// Input payload for [`ActivityRecord::new`]; also the serde wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecordDraft {
    pub id: Uuid,
    pub user_id: UserId,
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    pub coins_earned: u64,
    pub recorded_at: DateTime<Utc>,
}

/// A finalized, immutable activity entry.
///
/// ## Invariants
/// - `coins_earned == calories_burned / 10` (the floor conversion policy).
/// - Immutable once constructed; history order is append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ActivityRecordDraft", into = "ActivityRecordDraft")]
pub struct ActivityRecord {
    id: Uuid,
    user_id: UserId,
    activity_type: ActivityType,
    duration_minutes: u32,
    calories_burned: u32,
    coins_earned: u64,
    recorded_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Creates a validated activity record.
    pub fn new(draft: ActivityRecordDraft) -> Result<Self, ActivityValidationError> {
        Self::try_from(draft)
    }

    /// Stable record id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The owning user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Activity category.
    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    /// Whole tracked minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Whole calories burned.
    pub fn calories_burned(&self) -> u32 {
        self.calories_burned
    }

    /// Coins the chain granted for this activity.
    pub fn coins_earned(&self) -> u64 {
        self.coins_earned
    }

    /// Finalisation timestamp.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl TryFrom<ActivityRecordDraft> for ActivityRecord {
    type Error = ActivityValidationError;

    fn try_from(value: ActivityRecordDraft) -> Result<Self, Self::Error> {
        if value.id.is_nil() {
            return Err(ActivityValidationError::NilRecordId);
        }
        if value.coins_earned != u64::from(value.calories_burned) / 10 {
            return Err(ActivityValidationError::ConversionPolicyViolation {
                calories_burned: value.calories_burned,
                coins_earned: value.coins_earned,
            });
        }

        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            activity_type: value.activity_type,
            duration_minutes: value.duration_minutes,
            calories_burned: value.calories_burned,
            coins_earned: value.coins_earned,
            recorded_at: value.recorded_at,
        })
    }
}

impl From<ActivityRecord> for ActivityRecordDraft {
    fn from(value: ActivityRecord) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            activity_type: value.activity_type,
            duration_minutes: value.duration_minutes,
            calories_burned: value.calories_burned,
            coins_earned: value.coins_earned,
            recorded_at: value.recorded_at,
        }
    }
}
