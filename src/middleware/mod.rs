//! Ordered middleware chain around the route handlers.
//!
//! A request flows through the registered [`MiddlewareHandler`]s in order,
//! each one free to pass the request along via [`Next::run`], answer it
//! directly, or decorate the response on the way back out. The only built-in
//! middleware is [`AccessLog`], which emits one tracing record per request.

use std::{future::Future, pin::Pin, sync::Arc};
use tokio::time::Instant;

use crate::{Request, Response};

/// The rest of the chain, from one middleware's point of view.
///
/// Each middleware receives a `Next` and decides whether to call
/// [`Next::run`]. Because `run` consumes the cursor, a middleware can invoke
/// its downstream at most once.
///
/// # Examples
///
/// ```rust,no_run
/// use std::pin::Pin;
/// use nextword::{Request, Response, middleware::{Middleware, Next}};
///
/// struct PassThrough;
///
/// impl Middleware for PassThrough {
///     fn handle(
///         &self,
///         request: Request,
///         next: Next,
///     ) -> Pin<Box<dyn std::future::Future<Output = Response> + Send>> {
///         Box::pin(async move { next.run(request).await })
///     }
/// }
/// ```
pub struct Next {
    middlewares: Vec<MiddlewareHandler>,
    // Position of the next handler to invoke.
    index: usize,
}

/// A type-erased middleware function.
///
/// Stored behind [`Arc`] so [`Next`] can clone its way down the chain
/// without copying closures. Built with [`from_middleware`] or from a bare
/// closure:
///
/// ```rust,no_run
/// use std::{pin::Pin, sync::Arc};
/// use nextword::{Request, Response, middleware::{MiddlewareHandler, Next}};
///
/// let handler: MiddlewareHandler = Arc::new(|request: Request, next: Next| {
///     Box::pin(async move { next.run(request).await })
/// });
/// ```
pub type MiddlewareHandler = Arc<
    dyn Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static,
>;

/// Wraps a [`Middleware`] implementation as a [`MiddlewareHandler`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use nextword::middleware::{AccessLog, from_middleware};
///
/// let handler = from_middleware(Arc::new(AccessLog));
/// ```
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |request: Request, next: Next| middleware.handle(request, next))
}

impl Next {
    /// Creates a cursor at the head of `middlewares`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use nextword::middleware::Next;
    ///
    /// let next = Next::new(vec![]);
    /// ```
    pub fn new(middlewares: Vec<MiddlewareHandler>) -> Self {
        Self {
            middlewares,
            index: 0,
        }
    }

    /// Runs the remainder of the chain and returns its response.
    ///
    /// A chain that runs out of handlers without producing a response yields
    /// a `500`; the application always installs a terminal handler, so that
    /// answer indicates a wiring bug.
    pub async fn run(mut self, request: Request) -> Response {
        if self.index < self.middlewares.len() {
            let handler = self.middlewares[self.index].clone();
            self.index += 1;
            handler(request, self).await
        } else {
            Response::new(crate::StatusCode::InternalServerError)
                .body("No response generated by middleware pipeline")
        }
    }
}

/// The core trait for all middleware in this crate.
///
/// Implementors receive a [`Request`] and a [`Next`] cursor. They may:
///
/// - **Pass through**: call `next.run(request).await` without modification.
/// - **Short-circuit**: return a [`Response`] directly without calling `next`.
/// - **Decorate**: call `next.run(request).await`, inspect the response, and
///   return a modified copy.
///
/// # Contract
///
/// - Implementations **must** be `Send + Sync` because middleware is shared
///   across Tokio tasks.
/// - `handle` **must** return a pinned, `Send` future so it can be awaited
///   across `.await` points in multi-threaded runtimes.
pub trait Middleware: Send + Sync {
    /// Process the request, delegating downstream via `next` if desired.
    fn handle(
        &self,
        request: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

/// Access logging middleware.
///
/// After the downstream handler completes, emits one tracing record with the
/// method, path, status, and elapsed time: `info!` normally, `warn!` for
/// 5xx responses. Never short-circuits.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use nextword::middleware::{AccessLog, from_middleware};
///
/// let handler = from_middleware(Arc::new(AccessLog));
/// ```
pub struct AccessLog;

impl Middleware for AccessLog {
    fn handle(
        &self,
        request: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = request.method().as_str().to_string();
            let path = request.path().to_string();

            let response = next.run(request).await;

            let duration = start.elapsed();
            let status = response.status().as_u16();

            if status >= 500 {
                tracing::warn!(%method, %path, status, ?duration, "request failed");
            } else {
                tracing::info!(%method, %path, status, ?duration, "request handled");
            }

            response
        })
    }
}
