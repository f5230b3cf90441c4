//! Handler and validator registry
//!
//! Built once at start-up through [`RegistryBuilder`] and read-only
//! afterwards. Entries are keyed by the request's `TypeId` and stored
//! type-erased; lookups downcast back to the concrete request type, so the
//! read path needs no locking and no per-request code.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use diary_rs_domain::Request;

use crate::application::handlers::{ErasedHandler, Handler};
use crate::application::validators::{ErasedValidator, Validator};
use crate::error::RegistryError;

type HandlerSlot<R> = Box<dyn ErasedHandler<R>>;
type ValidatorSlot<R> = Vec<Box<dyn ErasedValidator<R>>>;
type ErasedMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Immutable request-type-to-handler/validators map
pub struct Registry {
    handlers: ErasedMap,
    validators: ErasedMap,
    names: HashMap<TypeId, &'static str>,
}

impl Registry {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Handler registered for `R`
    #[must_use]
    pub fn handler<R: Request>(&self) -> Option<&dyn ErasedHandler<R>> {
        self.handlers
            .get(&TypeId::of::<R>())?
            .downcast_ref::<HandlerSlot<R>>()
            .map(|handler| &**handler)
    }

    /// Validators registered for `R`, in registration order
    #[must_use]
    pub fn validators<R: Request>(&self) -> &[Box<dyn ErasedValidator<R>>] {
        match self
            .validators
            .get(&TypeId::of::<R>())
            .and_then(|slot| slot.downcast_ref::<ValidatorSlot<R>>())
        {
            Some(validators) => validators.as_slice(),
            None => &[],
        }
    }

    /// Whether a handler is registered for `R`
    #[must_use]
    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Number of request types with a handler
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut requests: Vec<_> = self
            .handlers
            .keys()
            .filter_map(|id| self.names.get(id).copied())
            .collect();
        requests.sort_unstable();
        f.debug_struct("Registry").field("requests", &requests).finish()
    }
}

/// Collects registrations and checks the wiring on [`build`](Self::build)
///
/// # Examples
/// ```
/// use diary_rs::application::handlers::{Handler, HandlerResult};
/// use diary_rs::application::registry::Registry;
/// use diary_rs::error::RegistryError;
/// use diary_rs_domain::{Outcome, Request};
/// use tokio_util::sync::CancellationToken;
///
/// struct Ping;
/// impl Request for Ping {
///     type Response = Outcome;
/// }
///
/// struct PingHandler;
/// impl Handler<Ping> for PingHandler {
///     async fn handle(&self, _: Ping, _: &CancellationToken) -> HandlerResult<Outcome> {
///         Ok(Outcome::unit())
///     }
/// }
///
/// let registry = Registry::builder()
///     .handler::<Ping, _>(PingHandler)
///     .build()
///     .unwrap();
/// assert!(registry.contains::<Ping>());
///
/// let err = Registry::builder()
///     .handler::<Ping, _>(PingHandler)
///     .handler::<Ping, _>(PingHandler)
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, RegistryError::DuplicateHandler { .. }));
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: ErasedMap,
    validators: ErasedMap,
    names: HashMap<TypeId, &'static str>,
    // request types that must end up with a handler, first-seen order
    expected: Vec<TypeId>,
    errors: Vec<RegistryError>,
}

impl RegistryBuilder {
    /// Register the handler for `R`
    ///
    /// A second handler for the same request type is reported by
    /// [`build`](Self::build).
    #[must_use]
    pub fn handler<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: Handler<R>,
    {
        let id = self.note::<R>();
        if self.handlers.contains_key(&id) {
            self.errors.push(RegistryError::DuplicateHandler {
                request: type_name::<R>(),
            });
            return self;
        }

        tracing::debug!(
            request = type_name::<R>(),
            handler = type_name::<H>(),
            "registered handler"
        );
        let slot: HandlerSlot<R> = Box::new(handler);
        self.handlers.insert(id, Box::new(slot));
        self
    }

    /// Append a validator for `R`
    ///
    /// Validators run in the order they are registered.
    #[must_use]
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R>,
    {
        let id = self.note::<R>();
        tracing::debug!(
            request = type_name::<R>(),
            validator = type_name::<V>(),
            "registered validator"
        );

        let slot = self
            .validators
            .entry(id)
            .or_insert_with(|| Box::new(ValidatorSlot::<R>::new()) as Box<dyn Any + Send + Sync>);
        match slot.downcast_mut::<ValidatorSlot<R>>() {
            Some(validators) => validators.push(Box::new(validator)),
            None => self.errors.push(RegistryError::SlotTypeMismatch {
                request: type_name::<R>(),
            }),
        }
        self
    }

    /// Declare that `R` must have a handler by the time the registry is built
    #[must_use]
    pub fn require<R: Request>(mut self) -> Self {
        self.note::<R>();
        self
    }

    /// Check the wiring and freeze the registry
    ///
    /// # Errors
    /// - [`RegistryError::DuplicateHandler`] if a request type got two handlers
    /// - [`RegistryError::MissingHandler`] if a request type has validators or
    ///   was [`require`](Self::require)d but has no handler
    /// - [`RegistryError::SlotTypeMismatch`] if a validator could not be
    ///   stored under its request type
    ///
    /// The first defect in registration order is reported.
    pub fn build(mut self) -> Result<Registry, RegistryError> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }

        if let Some(missing) = self
            .expected
            .iter()
            .find(|id| !self.handlers.contains_key(*id))
        {
            return Err(RegistryError::MissingHandler {
                request: self.names.get(missing).copied().unwrap_or("<unknown>"),
            });
        }

        tracing::info!(
            handlers = self.handlers.len(),
            validated_requests = self.validators.len(),
            "request registry built"
        );

        Ok(Registry {
            handlers: self.handlers,
            validators: self.validators,
            names: self.names,
        })
    }

    fn note<R: Request>(&mut self) -> TypeId {
        let id = TypeId::of::<R>();
        if self.names.insert(id, type_name::<R>()).is_none() {
            self.expected.push(id);
        }
        id
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("requests", &self.expected.len())
            .field("handlers", &self.handlers.len())
            .field("errors", &self.errors)
            .finish()
    }
}
