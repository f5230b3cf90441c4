//! Error code to response status policy
//!
//! Feature handlers report failures through dot-namespaced codes. Any caller
//! exposing outcomes over a network maps them by substring, checked in this
//! order:
//!
//! | code contains                 | class          | status |
//! |-------------------------------|----------------|--------|
//! | `NotFound`                    | `NotFound`     | 404    |
//! | `Validation`                  | `BadRequest`   | 400    |
//! | `AlreadyExists`               | `Conflict`     | 409    |
//! | `Authentication.InvalidToken` | `Unauthorized` | 401    |
//! | anything else                 | `ServerError`  | 500    |

use diary_rs_domain::Error;

/// Response category for a failed outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    /// The addressed resource does not exist
    NotFound,
    /// The request was rejected by validation
    BadRequest,
    /// The resource already exists
    Conflict,
    /// The caller's token is not valid
    Unauthorized,
    /// Any other failure
    ServerError,
}

impl ResponseClass {
    /// Classify a failure by its code
    ///
    /// ```
    /// use diary_rs::infrastructure::http::ResponseClass;
    /// use diary_rs_domain::Error;
    ///
    /// let err = Error::from_static("Recipe.NotFound", "missing");
    /// assert_eq!(ResponseClass::classify(&err), ResponseClass::NotFound);
    /// assert_eq!(ResponseClass::classify(&err).status_code(), 404);
    /// ```
    #[must_use]
    pub fn classify(error: &Error) -> Self {
        let code = error.code();
        if code.contains("NotFound") {
            Self::NotFound
        } else if code.contains("Validation") {
            Self::BadRequest
        } else if code.contains("AlreadyExists") {
            Self::Conflict
        } else if code.contains("Authentication.InvalidToken") {
            Self::Unauthorized
        } else {
            Self::ServerError
        }
    }

    /// Numeric HTTP status for this class
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest => 400,
            Self::Conflict => 409,
            Self::Unauthorized => 401,
            Self::ServerError => 500,
        }
    }
}
