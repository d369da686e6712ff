//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::not_authenticated("no session"), ErrorCode::NotAuthenticated)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::invalid_argument("bad kind"), ErrorCode::InvalidArgument)]
#[case(Error::remote("timeout"), ErrorCode::RemoteFailure)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::NotFound, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_placeholder_for_blank_messages() {
    let error = Error::remote("");
    assert_eq!(error.code(), ErrorCode::RemoteFailure);
    assert_eq!(error.message(), FALLBACK_MESSAGE);
}

#[rstest]
fn display_renders_message_only() {
    let error = Error::not_found("item 7 does not exist");
    assert_eq!(error.to_string(), "item 7 does not exist");
}

#[rstest]
fn serialises_with_snake_case_code() {
    let value = serde_json::to_value(Error::invalid_argument("bad kind")).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "invalid_argument", "message": "bad kind" })
    );
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "not_found", "message": " " }));
    assert!(result.is_err());
}
