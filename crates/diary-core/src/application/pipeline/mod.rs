//! Dispatch pipeline stages
//!
//! Stages wrap the handler invocation and run strictly in order for a single
//! dispatch. Validation is currently the only stage.

pub mod validation;

pub use validation::ValidationStage;
