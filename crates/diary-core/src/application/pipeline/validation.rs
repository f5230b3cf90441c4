//! Validation stage
//!
//! Runs every validator registered for the request, flattens their failures
//! in registration order and, if any exist, answers with a failure of the
//! request's own response type built from the *first* failure only. The
//! next stage is not invoked in that case. A first failure that folds into
//! `Error::NONE` is reported as a fault of the validator that produced it.
//!
//! Typed failure synthesis goes through [`Response::from_error`] on
//! `R::Response`, so this single generic implementation covers every request
//! type, including ones added later.

use std::any::type_name;
use std::future::Future;

use diary_rs_domain::{Request, Response, ValidationFailure};
use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::validators::ErasedValidator;
use crate::config::{DispatchConfig, ValidationMode};
use crate::error::{DispatchError, DispatchResult, Fault};

/// Validation middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationStage {
    mode: ValidationMode,
    log_failures: bool,
}

impl ValidationStage {
    /// Build the stage from dispatcher configuration
    #[must_use]
    pub const fn from_config(config: &DispatchConfig) -> Self {
        Self {
            mode: config.validation_mode,
            log_failures: config.log_validation_failures,
        }
    }

    /// Validate `request`, then hand it to `next` if nothing failed
    ///
    /// With no validators this is a straight call to `next`.
    ///
    /// # Errors
    /// - [`DispatchError::ValidatorFault`] if a validator faults
    /// - [`DispatchError::Cancelled`] if `cancellation` fires first
    /// - whatever `next` returns
    pub async fn run<R, F, Fut>(
        &self,
        request: R,
        validators: &[Box<dyn ErasedValidator<R>>],
        cancellation: &CancellationToken,
        next: F,
    ) -> DispatchResult<R::Response>
    where
        R: Request,
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = DispatchResult<R::Response>>,
    {
        if validators.is_empty() {
            return next(request).await;
        }

        let batches = tokio::select! {
            biased;
            () = cancellation.cancelled() => {
                return Err(DispatchError::Cancelled { request: type_name::<R>() });
            }
            batches = self.collect(&request, validators) => batches?,
        };

        let total: usize = batches.iter().map(Vec::len).sum();
        let Some((index, first)) = batches
            .into_iter()
            .enumerate()
            .find_map(|(index, batch)| batch.into_iter().next().map(|first| (index, first)))
        else {
            return next(request).await;
        };

        if self.log_failures {
            info!(
                request = type_name::<R>(),
                code = %first.error_code,
                property = %first.property_path,
                failures = total,
                "request rejected by validation"
            );
        }

        let error = first.into_error();
        if error.is_none() {
            return Err(validator_fault::<R>(
                &*validators[index],
                "validator reported an empty failure".into(),
            ));
        }

        Ok(R::Response::from_error(error))
    }

    async fn collect<R: Request>(
        &self,
        request: &R,
        validators: &[Box<dyn ErasedValidator<R>>],
    ) -> DispatchResult<Vec<Vec<ValidationFailure>>> {
        debug!(
            request = type_name::<R>(),
            validators = validators.len(),
            mode = ?self.mode,
            "running validators"
        );

        let batches = match self.mode {
            ValidationMode::Sequential => {
                let mut batches = Vec::with_capacity(validators.len());
                for validator in validators {
                    let failures = validator
                        .run(request)
                        .await
                        .map_err(|source| validator_fault::<R>(&**validator, source))?;
                    batches.push(failures);
                }
                batches
            }
            ValidationMode::Concurrent => {
                try_join_all(validators.iter().map(|validator| async move {
                    validator
                        .run(request)
                        .await
                        .map_err(|source| validator_fault::<R>(&**validator, source))
                }))
                .await?
            }
        };

        Ok(batches)
    }
}

impl Default for ValidationStage {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}

fn validator_fault<R: Request>(validator: &dyn ErasedValidator<R>, source: Fault) -> DispatchError {
    warn!(
        request = type_name::<R>(),
        validator = validator.name(),
        error = %source,
        "validator faulted"
    );
    DispatchError::ValidatorFault {
        request: type_name::<R>(),
        validator: validator.name(),
        source,
    }
}
