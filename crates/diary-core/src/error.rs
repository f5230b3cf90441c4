//! Fault types for dispatch operations
//!
//! Domain and validation failures never show up here; they travel inside
//! [`Outcome`](diary_rs_domain::Outcome) values. This module only describes
//! what can go wrong *around* a request: wiring defects, broken
//! infrastructure and cancellation.

/// Boxed infrastructure fault raised by a handler or validator
pub type Fault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for dispatch operations
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Fault raised while dispatching a request
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// No handler is registered for the request type
    #[error("no handler registered for request type `{request}`")]
    HandlerNotRegistered {
        /// Request type name
        request: &'static str,
    },

    /// A validator faulted instead of returning failures
    #[error("validator `{validator}` faulted while validating `{request}`: {source}")]
    ValidatorFault {
        /// Request type name
        request: &'static str,
        /// Validator type name
        validator: &'static str,
        /// Underlying fault
        #[source]
        source: Fault,
    },

    /// The handler faulted instead of returning an outcome
    #[error("handler for `{request}` faulted: {source}")]
    HandlerFault {
        /// Request type name
        request: &'static str,
        /// Underlying fault
        #[source]
        source: Fault,
    },

    /// The dispatch was cancelled by the caller
    #[error("dispatch of `{request}` was cancelled")]
    Cancelled {
        /// Request type name
        request: &'static str,
    },
}

impl DispatchError {
    /// Whether this fault is a wiring defect rather than a runtime condition
    #[must_use]
    pub const fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::HandlerNotRegistered { .. } | Self::ValidatorFault { .. }
        )
    }

    /// Whether the dispatch stopped because of cancellation
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Name of the request type that was being dispatched
    #[must_use]
    pub const fn request(&self) -> &'static str {
        match self {
            Self::HandlerNotRegistered { request }
            | Self::ValidatorFault { request, .. }
            | Self::HandlerFault { request, .. }
            | Self::Cancelled { request } => *request,
        }
    }
}

/// Start-up wiring defects detected while building a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// More than one handler registered for a request type
    #[error("more than one handler registered for request type `{request}`")]
    DuplicateHandler {
        /// Request type name
        request: &'static str,
    },

    /// A request type is known to the registry but has no handler
    #[error("request type `{request}` has no registered handler")]
    MissingHandler {
        /// Request type name
        request: &'static str,
    },
    /// The stored entry for a request type does not downcast to that type
    #[error("registry entry for request type `{request}` holds a foreign slot type")]
    SlotTypeMismatch {
        /// Request type name
        request: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_fault_classification() {
        let missing = DispatchError::HandlerNotRegistered { request: "Login" };
        assert!(missing.is_configuration_fault());
        assert_eq!(missing.request(), "Login");

        let cancelled = DispatchError::Cancelled { request: "Login" };
        assert!(!cancelled.is_configuration_fault());
        assert!(cancelled.is_cancelled());

        let faulted = DispatchError::HandlerFault {
            request: "Login",
            source: "database unavailable".into(),
        };
        assert!(!faulted.is_configuration_fault());
        assert!(faulted.to_string().contains("database unavailable"));
    }
}
