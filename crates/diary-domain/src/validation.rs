//! Validation failure value object

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Error;

/// One rule violation reported by a validator
///
/// Lives for a single dispatch; the middleware folds the first one it sees
/// into an [`Error`] and drops the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Path of the offending property, e.g. `"UserId"` or `"Items[2].Name"`
    pub property_path: String,
    /// Machine-readable code, becomes [`Error::code`]
    pub error_code: Cow<'static, str>,
    /// Human-readable message, becomes [`Error::message`]
    pub message: Cow<'static, str>,
}

impl ValidationFailure {
    /// Create a validation failure
    pub fn new(
        property_path: impl Into<String>,
        error_code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            property_path: property_path.into(),
            error_code: error_code.into(),
            message: message.into(),
        }
    }

    /// Fold into the error surfaced to callers
    ///
    /// The property path is dropped; callers branch on the code.
    #[must_use]
    pub fn into_error(self) -> Error {
        Error::new(self.error_code, self.message)
    }
}

impl From<ValidationFailure> for Error {
    fn from(failure: ValidationFailure) -> Self {
        failure.into_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_error_keeps_code_and_message() {
        let failure = ValidationFailure::new(
            "UserId",
            "Authentication.InvalidToken",
            "The token is invalid",
        );
        let error: Error = failure.into();
        assert_eq!(error.code(), "Authentication.InvalidToken");
        assert_eq!(error.message(), "The token is invalid");
    }

    #[test]
    fn test_serializes_camel_case() {
        let failure = ValidationFailure::new("Email", "Validation.Email", "bad email");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["propertyPath"], "Email");
        assert_eq!(json["errorCode"], "Validation.Email");
    }
}
