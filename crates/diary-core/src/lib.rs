//! # Diary Core
//!
//! Request dispatch for the food diary backend. A typed request is routed to
//! exactly one handler, validated on the way in, and every expected outcome,
//! success or domain failure, comes back as an
//! [`Outcome`](diary_rs_domain::Outcome) value.
//!
//! ```
//! use diary_rs::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! struct GetUserById {
//!     user_id: Option<u64>,
//! }
//!
//! impl Request for GetUserById {
//!     type Response = Outcome<String>;
//! }
//!
//! struct GetUserByIdHandler;
//!
//! impl Handler<GetUserById> for GetUserByIdHandler {
//!     async fn handle(
//!         &self,
//!         request: GetUserById,
//!         _cancellation: &CancellationToken,
//!     ) -> HandlerResult<Outcome<String>> {
//!         Ok(Outcome::success(format!("user-{}", request.user_id.unwrap_or_default())))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = Registry::builder()
//!     .handler::<GetUserById, _>(GetUserByIdHandler)
//!     .validator::<GetUserById, _>(RuleValidator::new().rule(
//!         "UserId",
//!         "Validation.Required",
//!         "UserId is required",
//!         |r: &GetUserById| r.user_id.is_some(),
//!     ))
//!     .build()
//!     .unwrap();
//! let dispatcher = Dispatcher::new(registry);
//! let token = CancellationToken::new();
//!
//! let found = dispatcher.send(GetUserById { user_id: Some(7) }, &token).await.unwrap();
//! assert_eq!(found.value(), "user-7");
//!
//! let rejected = dispatcher.send(GetUserById { user_id: None }, &token).await.unwrap();
//! assert_eq!(rejected.error().code(), "Validation.Required");
//! # });
//! ```

#![warn(rust_2018_idioms)]
#![warn(missing_docs)]

pub mod application;
pub mod config;
pub mod error;
pub mod infrastructure;

// Domain re-exports
pub use diary_rs_domain::{
    Error, InvariantViolation, Outcome, Request, Response, ValidationFailure,
};

// Application layer exports
pub use application::{
    Dispatcher, Handler, HandlerResult, Registry, RegistryBuilder, RuleValidator, ValidationResult,
    ValidationStage, Validator, validators::rules,
};

// Configuration exports
pub use config::{ConfigError, DispatchConfig, ValidationMode};

pub use error::{DispatchError, DispatchResult, Fault, RegistryError};
pub use infrastructure::http::ResponseClass;
#[cfg(feature = "http-server")]
pub use infrastructure::http::{ErrorBody, OutcomeResponse};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        DispatchConfig, DispatchError, DispatchResult, Dispatcher, Error, Fault, Handler,
        HandlerResult, Outcome, Registry, Request, Response, RuleValidator, ValidationFailure,
        ValidationMode, ValidationResult, Validator,
    };
}
