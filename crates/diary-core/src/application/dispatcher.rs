//! Request dispatcher
//!
//! Routes a request to the single handler registered for its type, through
//! the validation stage. Whatever the pipeline produces is returned to the
//! caller unchanged.

use std::any::type_name;
use std::sync::Arc;

use diary_rs_domain::{Request, Response};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, warn};

use crate::application::handlers::ErasedHandler;
use crate::application::pipeline::ValidationStage;
use crate::application::registry::Registry;
use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};

/// Entry point for sending requests to their handlers
///
/// Cheap to clone; clones share the same read-only [`Registry`]. Each call
/// to [`send`](Self::send) is independent of every other.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    validation: ValidationStage,
}

impl Dispatcher {
    /// Dispatcher with default configuration
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, &DispatchConfig::default())
    }

    /// Dispatcher with explicit configuration
    #[must_use]
    pub fn with_config(registry: Registry, config: &DispatchConfig) -> Self {
        Self::from_shared(Arc::new(registry), config)
    }

    /// Dispatcher over an already shared registry
    #[must_use]
    pub fn from_shared(registry: Arc<Registry>, config: &DispatchConfig) -> Self {
        Self {
            registry,
            validation: ValidationStage::from_config(config),
        }
    }

    /// The registry requests are resolved against
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Validate `request` and hand it to its handler
    ///
    /// Domain and validation failures come back as failed responses inside
    /// `Ok`. Only faults use `Err`.
    ///
    /// # Errors
    /// - [`DispatchError::HandlerNotRegistered`] if `R` has no handler
    /// - [`DispatchError::ValidatorFault`] if a validator faults
    /// - [`DispatchError::HandlerFault`] if the handler faults
    /// - [`DispatchError::Cancelled`] if `cancellation` fires before the
    ///   pipeline finishes
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancellation: &CancellationToken,
    ) -> DispatchResult<R::Response> {
        let span = tracing::debug_span!("dispatch", request = type_name::<R>());
        self.dispatch(request, cancellation).instrument(span).await
    }

    async fn dispatch<R: Request>(
        &self,
        request: R,
        cancellation: &CancellationToken,
    ) -> DispatchResult<R::Response> {
        let Some(handler) = self.registry.handler::<R>() else {
            error!(request = type_name::<R>(), "no handler registered");
            return Err(DispatchError::HandlerNotRegistered {
                request: type_name::<R>(),
            });
        };

        if cancellation.is_cancelled() {
            return Err(DispatchError::Cancelled {
                request: type_name::<R>(),
            });
        }

        let validators = self.registry.validators::<R>();
        self.validation
            .run(request, validators, cancellation, |request| {
                invoke(handler, request, cancellation)
            })
            .await
    }
}

async fn invoke<R: Request>(
    handler: &dyn ErasedHandler<R>,
    request: R,
    cancellation: &CancellationToken,
) -> DispatchResult<R::Response> {
    let result = tokio::select! {
        biased;
        () = cancellation.cancelled() => {
            return Err(DispatchError::Cancelled { request: type_name::<R>() });
        }
        result = handler.call(request, cancellation) => result,
    };

    match result {
        Ok(response) => {
            debug!(
                handler = handler.name(),
                success = response.as_failure().is_none(),
                "handler completed"
            );
            Ok(response)
        }
        Err(source) => {
            warn!(handler = handler.name(), error = %source, "handler faulted");
            Err(DispatchError::HandlerFault {
                request: type_name::<R>(),
                source,
            })
        }
    }
}
