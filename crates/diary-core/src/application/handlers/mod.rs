//! Request handler contract
//!
//! A handler fulfils exactly one request type. Expected domain failures are
//! returned as failed outcomes; only infrastructure faults use the `Err` arm.
//!
//! Handlers are written against [`Handler`], which returns a `Send` future
//! without boxing. The registry stores them behind [`ErasedHandler`], the
//! boxed, object-safe form needed for lookup by request type.

use std::future::Future;

use diary_rs_domain::Request;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::Fault;

/// Handler result: the request's response, or an infrastructure fault
pub type HandlerResult<T> = Result<T, Fault>;

/// Handler for one request type
///
/// # Examples
/// ```
/// use diary_rs::application::handlers::{Handler, HandlerResult};
/// use diary_rs_domain::{Outcome, Request};
/// use tokio_util::sync::CancellationToken;
///
/// struct Ping;
///
/// impl Request for Ping {
///     type Response = Outcome<&'static str>;
/// }
///
/// struct PingHandler;
///
/// impl Handler<Ping> for PingHandler {
///     async fn handle(
///         &self,
///         _request: Ping,
///         _cancellation: &CancellationToken,
///     ) -> HandlerResult<Outcome<&'static str>> {
///         Ok(Outcome::success("pong"))
///     }
/// }
/// ```
pub trait Handler<R: Request>: Send + Sync + 'static {
    /// Handle the request
    ///
    /// Long-running handlers should observe `cancellation`; the dispatcher
    /// also stops polling the returned future once it fires.
    fn handle(
        &self,
        request: R,
        cancellation: &CancellationToken,
    ) -> impl Future<Output = HandlerResult<R::Response>> + Send;
}

/// Object-safe handler used by the registry
pub trait ErasedHandler<R: Request>: Send + Sync {
    /// Invoke the handler
    fn call<'a>(
        &'a self,
        request: R,
        cancellation: &'a CancellationToken,
    ) -> BoxFuture<'a, HandlerResult<R::Response>>;

    /// Type name of the concrete handler, for diagnostics
    fn name(&self) -> &'static str;
}

impl<R, H> ErasedHandler<R> for H
where
    R: Request,
    H: Handler<R>,
{
    fn call<'a>(
        &'a self,
        request: R,
        cancellation: &'a CancellationToken,
    ) -> BoxFuture<'a, HandlerResult<R::Response>> {
        Box::pin(self.handle(request, cancellation))
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<H>()
    }
}
