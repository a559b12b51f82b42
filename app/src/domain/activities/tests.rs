//! Regression coverage for activity records and the conversion policy.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::UserId;

#[fixture]
fn sample_draft() -> ActivityRecordDraft {
    ActivityRecordDraft {
        id: Uuid::new_v4(),
        user_id: UserId::new("0xabc123").expect("valid user id"),
        activity_type: ActivityType::Workout,
        duration_minutes: 2,
        calories_burned: 40,
        coins_earned: 4,
        recorded_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[rstest]
#[case(0.0, 0)]
#[case(9.9, 0)]
#[case(10.0, 1)]
#[case(40.0, 4)]
#[case(40.7, 4)]
#[case(125.0, 12)]
#[case(-3.0, 0)]
#[case(f64::NAN, 0)]
fn conversion_policy_floors_one_tenth(#[case] calories: f64, #[case] expected: u64) {
    assert_eq!(coins_for_calories(calories), expected);
}

#[rstest]
fn flooring_calories_first_cannot_change_the_coin_grant() {
    // floor(floor(c) / 10) == floor(c / 10) for all non-negative c.
    for tenth in 0..4000_u32 {
        let calories = f64::from(tenth) / 10.0;
        let floored = u64::from((calories.floor()) as u32) / 10;
        assert_eq!(coins_for_calories(calories), floored, "calories {calories}");
    }
}

#[rstest]
fn valid_draft_builds_a_record(sample_draft: ActivityRecordDraft) {
    let record = ActivityRecord::new(sample_draft.clone()).expect("valid record");
    assert_eq!(record.duration_minutes(), 2);
    assert_eq!(record.calories_burned(), 40);
    assert_eq!(record.coins_earned(), 4);
    assert_eq!(record.activity_type(), ActivityType::Workout);
}

#[rstest]
fn nil_record_ids_are_rejected(sample_draft: ActivityRecordDraft) {
    let mut draft = sample_draft;
    draft.id = Uuid::nil();
    assert_eq!(
        ActivityRecord::new(draft),
        Err(ActivityValidationError::NilRecordId)
    );
}

#[rstest]
#[case(40, 5)]
#[case(40, 3)]
#[case(9, 1)]
fn conversion_policy_violations_are_rejected(
    #[case] calories: u32,
    #[case] coins: u64,
    sample_draft: ActivityRecordDraft,
) {
    let mut draft = sample_draft;
    draft.calories_burned = calories;
    draft.coins_earned = coins;
    assert!(matches!(
        ActivityRecord::new(draft),
        Err(ActivityValidationError::ConversionPolicyViolation { .. })
    ));
}

#[rstest]
fn zero_calorie_records_carry_zero_coins(sample_draft: ActivityRecordDraft) {
    let mut draft = sample_draft;
    draft.calories_burned = 0;
    draft.coins_earned = 0;
    let record = ActivityRecord::new(draft).expect("zero-calorie record is valid");
    assert_eq!(record.coins_earned(), 0);
}

#[rstest]
fn serde_round_trips_camel_case(sample_draft: ActivityRecordDraft) {
    let record = ActivityRecord::new(sample_draft).expect("valid record");
    let json = serde_json::to_string(&record).expect("record serializes");
    assert!(json.contains("\"caloriesBurned\":40"));
    assert!(json.contains("\"activityType\":\"workout\""));

    let restored: ActivityRecord = serde_json::from_str(&json).expect("record deserializes");
    assert_eq!(restored, record);
}

#[rstest]
fn deserialisation_rejects_policy_violations(sample_draft: ActivityRecordDraft) {
    let mut draft = sample_draft;
    draft.coins_earned = 99;
    let json = serde_json::to_string(&draft).expect("draft serializes");
    assert!(serde_json::from_str::<ActivityRecord>(&json).is_err());
}

#[rstest]
fn activity_types_parse_from_strings() {
    assert_eq!("running".parse(), Ok(ActivityType::Running));
    assert!("swimming".parse::<ActivityType>().is_err());
}
