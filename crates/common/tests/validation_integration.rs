//! Integration tests for validation module
//!
//! Exercises the checks request builders run before touching the network.

use corbel_common::validation::{self, ValidationError};

/// Builders resolving an entity URI need its id.
#[test]
fn test_missing_identifier_is_reported_by_name() {
    let user_id: Option<&str> = None;
    let err = validation::value("userId", user_id).unwrap_err();

    assert_eq!(err.error_count(), 1);
    assert_eq!(err.errors[0].field, "userId");
    assert_eq!(err.to_string(), "userId value is mandatory and cannot be undefined");
}

/// Collection-level operations must not carry an entity id.
#[test]
fn test_fail_if_defined_uses_caller_message() {
    let err = validation::fail_if_defined(
        "clientId",
        Some("abc"),
        "This function not allowed client identifier",
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "This function not allowed client identifier");
}

/// Multiple missing credentials are reported together.
#[test]
fn test_values_aggregates_errors() {
    let err = validation::values(&[("clientId", None), ("clientSecret", None), ("urlBase", Some("x"))])
        .unwrap_err();

    assert_eq!(err.error_count(), 2);
    let message = err.to_string();
    assert!(message.starts_with("Validation failed with 2 errors"));
    assert!(message.contains("clientSecret"));
}

#[test]
fn test_merge_and_into_result() {
    let mut errors = ValidationError::new();
    assert_eq!(errors.clone().into_result(5).unwrap(), 5);

    errors.merge(ValidationError::field("a", "bad a"));
    errors.merge(ValidationError::field("b", "bad b"));
    assert!(errors.into_result(()).is_err());
}
