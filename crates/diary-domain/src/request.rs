//! Request and response contracts
//!
//! A request names its response type at the type level. The validation
//! middleware uses that link to synthesize a correctly typed failure for any
//! request without a per-request code path: it only needs
//! [`Response::from_error`] on `R::Response`.

use crate::{Error, Outcome};

/// An immutable value describing an intended operation
///
/// # Examples
/// ```
/// use diary_rs_domain::{Outcome, Request};
///
/// struct GetUserById {
///     user_id: u64,
/// }
///
/// impl Request for GetUserById {
///     type Response = Outcome<String>;
/// }
///
/// struct DeleteRecipe {
///     recipe_id: u64,
/// }
///
/// impl Request for DeleteRecipe {
///     // payload-less outcome
///     type Response = Outcome;
/// }
/// ```
pub trait Request: Send + Sync + 'static {
    /// Outcome produced by the handler of this request
    type Response: Response;
}

/// A response type the dispatch pipeline can build failures of
///
/// Implemented for every [`Outcome<T>`], which covers both the payload-less
/// and the payload-carrying forms. Custom response envelopes can implement it
/// as well; a request whose response does not implement this trait does not
/// compile.
pub trait Response: Send + 'static {
    /// Build the failed form of this response carrying `error`
    ///
    /// `error` is never [`Error::NONE`] when called by the pipeline.
    fn from_error(error: Error) -> Self;

    /// The carried error if this response is a failure
    fn as_failure(&self) -> Option<&Error>;
}

impl<T: Send + 'static> Response for Outcome<T> {
    #[track_caller]
    fn from_error(error: Error) -> Self {
        Outcome::failure(error)
    }

    fn as_failure(&self) -> Option<&Error> {
        if self.is_failure() {
            Some(self.error())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Request for Ping {
        type Response = Outcome<u32>;
    }

    fn synthesize<R: Request>(error: Error) -> R::Response {
        R::Response::from_error(error)
    }

    #[test]
    fn test_failure_synthesis_from_request_type() {
        let error = Error::from_static("Validation.Required", "required");
        let response = synthesize::<Ping>(error.clone());
        assert!(response.is_failure());
        assert_eq!(response.as_failure(), Some(&error));
    }

    #[test]
    fn test_success_reports_no_failure() {
        let outcome = Outcome::success(5u32);
        assert_eq!(outcome.as_failure(), None);
    }
}
