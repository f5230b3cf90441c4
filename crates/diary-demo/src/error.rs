//! Demo error type

use diary_rs::{ConfigError, DispatchError, RegistryError};

/// Errors surfaced by the demo binary
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Invalid dispatch configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Inconsistent handler wiring
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A dispatch faulted
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Socket or file error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A scenario produced something other than what it demonstrates
    #[error("scenario `{scenario}` failed: {detail}")]
    Scenario {
        /// Scenario name
        scenario: &'static str,
        /// What went wrong
        detail: String,
    },
}

/// Demo result alias
pub type DemoResult<T> = Result<T, DemoError>;
