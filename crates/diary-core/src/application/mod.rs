//! Application layer - request dispatch and validation
//!
//! Implements the mediator side of the CQRS pattern: every command or query
//! is a [`Request`](diary_rs_domain::Request) with exactly one
//! [`Handler`](handlers::Handler), any number of
//! [`Validator`](validators::Validator)s, and an
//! [`Outcome`](diary_rs_domain::Outcome) as its response.
//!
//! Control flow for one dispatch:
//!
//! ```text
//! caller -> Dispatcher::send -> ValidationStage -> Handler -> Outcome -> caller
//!                                    |
//!                                    +-> first failure -> R::Response::from_error
//! ```

pub mod dispatcher;
pub mod handlers;
pub mod pipeline;
pub mod registry;
pub mod validators;

pub use dispatcher::Dispatcher;
pub use handlers::{Handler, HandlerResult};
pub use pipeline::ValidationStage;
pub use registry::{Registry, RegistryBuilder};
pub use validators::{RuleValidator, ValidationResult, Validator};
