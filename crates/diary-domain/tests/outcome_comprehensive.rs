//! Comprehensive tests for Outcome and Error
//!
//! Covers:
//! - success/failure factories for unit and payload outcomes
//! - invariant enforcement at every construction site
//! - value access semantics (non-consuming reads, panics on failure)
//! - error catalogues declared as constants
//! - serde representation of errors

use diary_rs_domain::{Error, InvariantViolation, Outcome, Request, Response, ValidationFailure};

// ============================================================================
// Catalogue fixtures
// ============================================================================

mod user_errors {
    use diary_rs_domain::Error;

    pub const NOT_FOUND: Error = Error::from_static("User.NotFound", "The user was not found");
    pub const ALREADY_EXISTS: Error =
        Error::from_static("User.AlreadyExists", "A user with this email already exists");
}

#[derive(Debug, Clone, PartialEq)]
struct UserResponse {
    id: u64,
    email: String,
}

// ============================================================================
// Factory Tests
// ============================================================================

#[test]
fn test_unit_success_and_failure() {
    let ok = Outcome::unit();
    assert!(ok.is_success());
    assert!(!ok.is_failure());
    assert_eq!(ok.error(), &Error::NONE);

    let failed: Outcome = Outcome::failure(user_errors::ALREADY_EXISTS);
    assert!(failed.is_failure());
    assert_eq!(failed.error(), &user_errors::ALREADY_EXISTS);
}

#[test]
fn test_payload_success_value_is_stable() {
    let user = UserResponse {
        id: 7,
        email: "ann@example.com".to_string(),
    };
    let outcome = Outcome::success(user.clone());

    assert!(outcome.is_success());
    assert_eq!(outcome.value(), &user);
    // second read returns the same value
    assert_eq!(outcome.value(), &user);
    assert_eq!(outcome.into_value(), user);
}

#[test]
fn test_payload_failure_has_no_value() {
    let outcome: Outcome<UserResponse> = Outcome::failure(user_errors::NOT_FOUND);
    assert_eq!(outcome.try_value(), None);
    assert_eq!(outcome.into_result(), Err(user_errors::NOT_FOUND));
}

// ============================================================================
// Invariant Tests
// ============================================================================

#[test]
fn test_try_failure_rejects_none() {
    assert_eq!(
        Outcome::<UserResponse>::try_failure(Error::NONE),
        Err(InvariantViolation::FailureWithoutError)
    );
}

#[test]
fn test_structurally_empty_error_is_none() {
    let empty = Error::new(String::new(), String::new());
    assert_eq!(
        Outcome::<()>::try_failure(empty),
        Err(InvariantViolation::FailureWithoutError)
    );
}

#[test]
#[should_panic(expected = "cannot carry an error")]
fn test_direct_construction_success_with_error_panics() {
    let _ = Outcome::from_parts(true, user_errors::NOT_FOUND, Some(()));
}

#[test]
#[should_panic(expected = "must carry an error")]
fn test_direct_construction_failure_without_error_panics() {
    let _ = Outcome::<()>::from_parts(false, Error::NONE, None);
}

#[test]
#[should_panic(expected = "cannot be accessed")]
fn test_into_value_of_failure_panics() {
    let outcome: Outcome<u8> = Outcome::failure(user_errors::NOT_FOUND);
    let _ = outcome.into_value();
}

#[test]
#[should_panic(expected = "must carry an error")]
fn test_from_result_err_none_panics() {
    let _: Outcome<u8> = Err(Error::NONE).into();
}

// ============================================================================
// Response synthesis
// ============================================================================

struct GetUserById;

impl Request for GetUserById {
    type Response = Outcome<UserResponse>;
}

struct DeleteUser;

impl Request for DeleteUser {
    type Response = Outcome;
}

fn synthesize<R: Request>(failure: ValidationFailure) -> R::Response {
    R::Response::from_error(failure.into_error())
}

#[test]
fn test_synthesis_for_payload_and_unit_responses() {
    let failure = ValidationFailure::new("UserId", "Validation.Required", "UserId is required");

    let typed = synthesize::<GetUserById>(failure.clone());
    assert_eq!(typed.error().code(), "Validation.Required");
    assert_eq!(typed.try_value(), None);

    let unit = synthesize::<DeleteUser>(failure);
    assert_eq!(unit.as_failure().map(Error::code), Some("Validation.Required"));
}

// ============================================================================
// Error serde
// ============================================================================

#[test]
fn test_error_json_shape() {
    let json = serde_json::to_value(&user_errors::NOT_FOUND).unwrap();
    assert_eq!(json["code"], "User.NotFound");
    assert_eq!(json["message"], "The user was not found");

    let back: Error = serde_json::from_value(json).unwrap();
    assert_eq!(back, user_errors::NOT_FOUND);
}

#[test]
fn test_from_option_uses_null_value() {
    let missing: Outcome<UserResponse> = Outcome::from_option(None);
    assert_eq!(missing.error().code(), "Error.NullValue");
}
