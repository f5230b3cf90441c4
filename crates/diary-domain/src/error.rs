//! Error descriptor value object
//!
//! An [`Error`] is a stable, dot-namespaced machine code paired with a
//! human-readable message. Callers branch on the code; transports map it to
//! protocol status codes. Errors compare structurally and are never mutated
//! after construction.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Immutable `(code, message)` pair describing a domain failure
///
/// Codes follow the `Namespace.Reason` convention (`"User.NotFound"`,
/// `"Validation.Required"`). Both parts are `Cow<'static, str>` so that
/// feature modules can keep their error catalogues in `const` items.
///
/// # Examples
/// ```
/// use diary_rs_domain::Error;
///
/// const NOT_FOUND: Error = Error::from_static("User.NotFound", "The user was not found");
///
/// assert_eq!(NOT_FOUND.code(), "User.NotFound");
/// assert_eq!(NOT_FOUND.namespace(), Some("User"));
/// assert!(!NOT_FOUND.is_none());
/// assert!(Error::NONE.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Error {
    code: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl Error {
    /// The "no error" sentinel carried by every successful outcome
    pub const NONE: Self = Self::from_static("", "");

    /// Reported when an outcome is built from a missing value
    pub const NULL_VALUE: Self =
        Self::from_static("Error.NullValue", "The specified result value is null.");

    /// Create an error from owned or borrowed parts
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an error from static strings, usable in `const` context
    #[must_use]
    pub const fn from_static(code: &'static str, message: &'static str) -> Self {
        Self {
            code: Cow::Borrowed(code),
            message: Cow::Borrowed(message),
        }
    }

    /// Create a `Validation.<property>` error
    ///
    /// ```
    /// use diary_rs_domain::Error;
    ///
    /// let err = Error::validation("Email", "Email is required");
    /// assert_eq!(err.code(), "Validation.Email");
    /// ```
    pub fn validation(property: &str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(format!("Validation.{property}"), message)
    }

    /// Machine-readable code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Segment of the code before the first `.`, if the code is namespaced
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.code.split_once('.').map(|(namespace, _)| namespace)
    }

    /// Whether this is structurally equal to [`Error::NONE`]
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.code.is_empty() && self.message.is_empty()
    }
}

impl Default for Error {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let owned = Error::new("User.NotFound".to_string(), "missing".to_string());
        let borrowed = Error::from_static("User.NotFound", "missing");
        assert_eq!(owned, borrowed);
        assert_ne!(owned, Error::from_static("User.NotFound", "other"));
    }

    #[test]
    fn test_none_sentinel() {
        assert!(Error::NONE.is_none());
        assert!(Error::new("", "").is_none());
        assert!(Error::default().is_none());
        assert!(!Error::new("", "message only").is_none());
        assert!(!Error::NULL_VALUE.is_none());
    }

    #[test]
    fn test_namespace() {
        assert_eq!(
            Error::from_static("Authentication.InvalidToken", "x").namespace(),
            Some("Authentication")
        );
        assert_eq!(Error::from_static("Flat", "x").namespace(), None);
    }

    #[test]
    fn test_display() {
        let err = Error::from_static("Recipe.NotFound", "Recipe does not exist");
        assert_eq!(err.to_string(), "Recipe.NotFound: Recipe does not exist");
    }
}
