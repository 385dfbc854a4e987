//! Argument validation for request builders
//!
//! Builders check required identifiers before any network activity. A
//! failed check yields a [`ValidationError`] listing every offending field.

use std::fmt;

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with field-level details
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> ValidationResult<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [single] => write!(f, "{}", single.message),
            errors => {
                write!(f, "Validation failed with {} errors: ", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Require a value to be present.
///
/// # Errors
/// Returns a field error `"<field> value is mandatory and cannot be undefined"`
/// when `value` is `None`.
pub fn value<T>(field: &str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or_else(|| {
        ValidationError::field(field, format!("{field} value is mandatory and cannot be undefined"))
    })
}

/// Require a non-empty string.
///
/// # Errors
/// Returns a field error when `value` is `None` or empty.
pub fn non_empty<'a>(field: &str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    self::value(field, value.filter(|v| !v.is_empty()))
}

/// Require several named strings at once, reporting every missing or empty
/// one.
///
/// # Errors
/// Returns one field error per missing entry.
pub fn values(entries: &[(&str, Option<&str>)]) -> ValidationResult<()> {
    let mut errors = ValidationError::new();
    for (field, entry) in entries {
        if let Err(err) = non_empty(field, *entry) {
            errors.merge(err);
        }
    }
    errors.into_result(())
}

/// Reject a value that must not be set in this context.
///
/// # Errors
/// Returns a field error carrying `message` when `value` is `Some`.
pub fn fail_if_defined<T>(field: &str, value: Option<T>, message: &str) -> ValidationResult<()> {
    match value {
        Some(_) => Err(ValidationError::field(field, message)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_reports_missing_field() {
        let err = value::<&str>("clientId", None).unwrap_err();
        assert_eq!(err.to_string(), "clientId value is mandatory and cannot be undefined");
        assert_eq!(value("clientId", Some("abc")).unwrap(), "abc");
    }

    #[test]
    fn non_empty_rejects_blank() {
        assert!(non_empty("refreshToken", Some("")).is_err());
        assert_eq!(non_empty("refreshToken", Some("r1")).unwrap(), "r1");
    }

    #[test]
    fn values_collects_every_missing_field() {
        let err = values(&[("a", None), ("b", Some("x")), ("c", None)]).unwrap_err();
        assert_eq!(err.error_count(), 2);
        assert!(err.to_string().contains("a: a value is mandatory"));
        assert!(err.to_string().contains("c: c value is mandatory"));
    }

    #[test]
    fn fail_if_defined_only_rejects_present_values() {
        assert!(fail_if_defined::<&str>("userId", None, "not allowed").is_ok());
        let err = fail_if_defined("userId", Some("me"), "not allowed").unwrap_err();
        assert_eq!(err.to_string(), "not allowed");
    }
}
