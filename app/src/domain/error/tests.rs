//! Tests for the error payload constructors and serialisation contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn detailed_error() -> Error {
    Error::insufficient_funds("balance 3 cannot cover 100")
        .with_details(json!({ "requested": 100, "balance": 3 }))
}

#[rstest]
#[case(Error::insufficient_funds("short"), ErrorCode::InsufficientFunds)]
#[case(Error::not_registered("nobody here"), ErrorCode::NotRegistered)]
#[case(Error::remote_operation_failed("chain down"), ErrorCode::RemoteOperationFailed)]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] err: Error, #[case] code: ErrorCode) {
    assert_eq!(err.code(), code);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn display_renders_the_message(detailed_error: Error) {
    assert_eq!(detailed_error.to_string(), "balance 3 cannot cover 100");
}

#[rstest]
fn details_round_trip_through_serde(detailed_error: Error) {
    let json = serde_json::to_string(&detailed_error).expect("error serializes");
    assert!(json.contains("\"code\":\"insufficient_funds\""));

    let restored: Error = serde_json::from_str(&json).expect("error deserializes");
    assert_eq!(restored, detailed_error);
}

#[rstest]
fn deserialisation_rejects_empty_messages() {
    let result = serde_json::from_str::<Error>(r#"{"code":"internal_error","message":"  "}"#);
    assert!(result.is_err());
}

#[rstest]
fn details_are_omitted_when_absent() {
    let json = serde_json::to_string(&Error::internal("boom")).expect("error serializes");
    assert!(!json.contains("details"));
}
