//! Request validator contract
//!
//! A request type may have any number of validators. Each one inspects the
//! request without touching shared state and returns its failures in the
//! order it found them. Returning `Err` means the validator itself broke;
//! the dispatcher treats that as a configuration fault.

pub mod rules;

use std::future::Future;

use diary_rs_domain::{Request, ValidationFailure};
use futures::future::BoxFuture;

use crate::error::Fault;

pub use rules::RuleValidator;

/// Validator result: the failures found, or a validator fault
pub type ValidationResult = Result<Vec<ValidationFailure>, Fault>;

/// Validator for one request type
pub trait Validator<R: Request>: Send + Sync + 'static {
    /// Inspect the request and report every rule it breaks
    fn validate(&self, request: &R) -> impl Future<Output = ValidationResult> + Send;
}

/// Object-safe validator used by the registry
pub trait ErasedValidator<R: Request>: Send + Sync {
    /// Run the validator
    fn run<'a>(&'a self, request: &'a R) -> BoxFuture<'a, ValidationResult>;

    /// Type name of the concrete validator, for diagnostics
    fn name(&self) -> &'static str;
}

impl<R, V> ErasedValidator<R> for V
where
    R: Request,
    V: Validator<R>,
{
    fn run<'a>(&'a self, request: &'a R) -> BoxFuture<'a, ValidationResult> {
        Box::pin(self.validate(request))
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<V>()
    }
}
