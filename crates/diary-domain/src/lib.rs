//! Diary Domain Layer - Outcome values and request contracts
//!
//! This crate contains the dependency-light core vocabulary of the food diary
//! dispatch pipeline. Nothing here performs I/O or suspends; it only describes
//! what a request is and what its outcome looks like.
//!
//! ## Architecture
//!
//! - **Error**: immutable `(code, message)` descriptor with a distinguished
//!   [`Error::NONE`] sentinel
//! - **Outcome**: success-with-value or failure-with-error, nothing else
//! - **Request / Response**: the type-level link between a request and the
//!   outcome its handler produces, used to synthesize typed failures
//! - **ValidationFailure**: a single rule violation reported by a validator
//!
//! ## Outcome vs. `std::result::Result`
//!
//! [`Outcome`] carries *expected* domain failures. Faults that are not part
//! of the domain vocabulary (missing wiring, broken infrastructure) travel
//! through ordinary `Result` values in the dispatch crate, and programming
//! errors such as reading the value of a failure panic.

#![warn(missing_docs)]

pub mod error;
pub mod outcome;
pub mod request;
pub mod validation;

// Re-export core types
pub use error::Error;
pub use outcome::Outcome;
pub use request::{Request, Response};
pub use validation::ValidationFailure;

/// Broken [`Outcome`] invariants
///
/// Returned by the fallible constructors and used as the panic payload
/// description by the panicking ones. Seeing one of these at runtime means
/// the calling code is wrong, not that the request was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// A successful outcome was paired with a real error
    #[error("a successful outcome cannot carry an error (got `{0}`)")]
    SuccessWithError(String),

    /// A failed outcome was paired with [`Error::NONE`]
    #[error("a failed outcome must carry an error other than Error::NONE")]
    FailureWithoutError,

    /// A successful outcome was built without a value
    #[error("a successful outcome must carry a value")]
    MissingValue,

    /// The value of a failed outcome was requested
    #[error("the value of a failed outcome cannot be accessed (error `{0}`)")]
    ValueOfFailure(String),
}
