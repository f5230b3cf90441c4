//! Outcome value object
//!
//! [`Outcome<T>`] represents every expected result of a request: success with
//! a value, or failure with a non-sentinel [`Error`]. `Outcome<()>` is the
//! payload-less form used by commands that only report whether they worked.
//!
//! # Invariants
//! - `is_success() == true` if and only if `error() == &Error::NONE`
//! - a failure never carries [`Error::NONE`]
//! - the value of a failure is never observable; asking for it panics
//!
//! Every constructor enforces the first two at the construction site. The
//! `try_*` constructors report violations as [`InvariantViolation`], the
//! others panic with the same description.

use crate::{Error, InvariantViolation};

static NO_ERROR: Error = Error::NONE;

/// Success-with-value or failure-with-error
///
/// # Examples
/// ```
/// use diary_rs_domain::{Error, Outcome};
///
/// let ok = Outcome::success(42);
/// assert!(ok.is_success());
/// assert_eq!(*ok.value(), 42);
/// assert!(ok.error().is_none());
///
/// let failed: Outcome<u32> = Outcome::failure(Error::from_static("User.NotFound", "no such user"));
/// assert!(failed.is_failure());
/// assert_eq!(failed.error().code(), "User.NotFound");
/// assert_eq!(failed.try_value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Outcome<T = ()> {
    state: State<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State<T> {
    Success(T),
    Failure(Error),
}

impl<T> Outcome<T> {
    /// Successful outcome wrapping `value`
    pub const fn success(value: T) -> Self {
        Self {
            state: State::Success(value),
        }
    }

    /// Failed outcome carrying `error`
    ///
    /// # Panics
    /// Panics if `error` is [`Error::NONE`].
    #[track_caller]
    pub fn failure(error: Error) -> Self {
        match Self::try_failure(error) {
            Ok(outcome) => outcome,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Failed outcome carrying `error`, rejecting the sentinel
    ///
    /// # Errors
    /// Returns [`InvariantViolation::FailureWithoutError`] if `error` is
    /// [`Error::NONE`].
    pub fn try_failure(error: Error) -> Result<Self, InvariantViolation> {
        if error.is_none() {
            return Err(InvariantViolation::FailureWithoutError);
        }
        Ok(Self {
            state: State::Failure(error),
        })
    }

    /// Direct constructor from the raw `(is_success, error, value)` triple
    ///
    /// # Panics
    /// Panics on any pairing rejected by [`Outcome::try_from_parts`].
    #[track_caller]
    pub fn from_parts(is_success: bool, error: Error, value: Option<T>) -> Self {
        match Self::try_from_parts(is_success, error, value) {
            Ok(outcome) => outcome,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Checked direct constructor
    ///
    /// A failure ignores `value`; the caller never gets it back.
    ///
    /// # Errors
    /// - [`InvariantViolation::SuccessWithError`] for `is_success` with a real error
    /// - [`InvariantViolation::MissingValue`] for `is_success` without a value
    /// - [`InvariantViolation::FailureWithoutError`] for a failure with [`Error::NONE`]
    pub fn try_from_parts(
        is_success: bool,
        error: Error,
        value: Option<T>,
    ) -> Result<Self, InvariantViolation> {
        match (is_success, error.is_none(), value) {
            (true, false, _) => Err(InvariantViolation::SuccessWithError(error.code().to_owned())),
            (true, true, None) => Err(InvariantViolation::MissingValue),
            (true, true, Some(value)) => Ok(Self::success(value)),
            (false, _, _) => Self::try_failure(error),
        }
    }

    /// Success if `value` is present, otherwise a [`Error::NULL_VALUE`] failure
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::success(value),
            None => Self::failure(Error::NULL_VALUE),
        }
    }

    /// Whether the outcome is a success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.state, State::Success(_))
    }

    /// Whether the outcome is a failure
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The carried error, [`Error::NONE`] for a success
    #[must_use]
    pub fn error(&self) -> &Error {
        match &self.state {
            State::Success(_) => &NO_ERROR,
            State::Failure(error) => error,
        }
    }

    /// Borrow the success value
    ///
    /// Repeated calls return the same value; reading does not consume it.
    ///
    /// # Panics
    /// Panics if the outcome is a failure. That is a bug in the caller, who
    /// must check [`Outcome::is_success`] first or use [`Outcome::try_value`].
    #[track_caller]
    #[must_use]
    pub fn value(&self) -> &T {
        match &self.state {
            State::Success(value) => value,
            State::Failure(error) => {
                panic!("{}", InvariantViolation::ValueOfFailure(error.code().to_owned()))
            }
        }
    }

    /// Borrow the success value if there is one
    #[must_use]
    pub const fn try_value(&self) -> Option<&T> {
        match &self.state {
            State::Success(value) => Some(value),
            State::Failure(_) => None,
        }
    }

    /// Take the success value
    ///
    /// # Panics
    /// Panics if the outcome is a failure.
    #[track_caller]
    #[must_use]
    pub fn into_value(self) -> T {
        match self.state {
            State::Success(value) => value,
            State::Failure(error) => {
                panic!("{}", InvariantViolation::ValueOfFailure(error.code().to_owned()))
            }
        }
    }

    /// Convert into a plain `Result` for `?`-style propagation
    ///
    /// # Errors
    /// Returns the carried error for a failure.
    pub fn into_result(self) -> Result<T, Error> {
        match self.state {
            State::Success(value) => Ok(value),
            State::Failure(error) => Err(error),
        }
    }

    /// Transform the success value, keeping a failure untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self.state {
            State::Success(value) => Outcome::success(f(value)),
            State::Failure(error) => Outcome {
                state: State::Failure(error),
            },
        }
    }

    /// Chain another fallible step after a success
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self.state {
            State::Success(value) => f(value),
            State::Failure(error) => Outcome {
                state: State::Failure(error),
            },
        }
    }
}

impl Outcome<()> {
    /// Payload-less success
    pub const fn unit() -> Self {
        Self::success(())
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    /// # Panics
    /// Panics for `Err(Error::NONE)`.
    #[track_caller]
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }
}
