//! Request routing: map paths and HTTP methods to handler functions.
//!
//! This module provides [`Router`], which dispatches incoming HTTP requests to
//! handler functions based on the request method and URL path. Matching is
//! exact; trailing slashes are normalized on both registered paths and
//! incoming requests, so `/predict/` and `/predict` are treated as equivalent.
//!
//! Routes are matched in registration order; the first route whose method and
//! path both match the incoming request wins. A known path hit with the wrong
//! method yields `405 Method Not Allowed` with an `Allow` header; anything
//! else yields `404 Not Found`.

use std::pin::Pin;
use std::sync::Arc;

use crate::{Method, Request, Response, StatusCode};

/// Type-erased, heap-allocated async handler that processes a [`Request`] and
/// returns a [`Response`].
///
/// Handlers are stored behind `Arc<dyn Fn(…)>` so they can be cloned and shared
/// across threads without copying the underlying closure. In practice you never
/// construct this type directly; use [`Router::get`] and [`Router::post`]
/// instead.
pub type Handler =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Adapter trait for async handler functions.
///
/// Blanket-implemented for every
/// `Fn(Request) -> impl Future<Output = Response> + Send` closure, so
/// [`Router::get`] and [`Router::post`] can take `impl IntoHandler` instead
/// of repeating the two-parameter where-clause at each registration site.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given request, boxing the returned future.
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(request))
    }
}

// Strip a trailing slash (other than the root `/`) so registration and lookup
// agree on one canonical form.
fn normalize(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

// A single registered route binding a method + path to a handler.
struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Method + path dispatch table.
///
/// Lookup walks the routes in registration order and takes the first
/// method-and-path match. A path registered only under other methods answers
/// `405` with an `Allow` header; an unknown path answers `404`.
///
/// # Examples
///
/// ```rust,no_run
/// use nextword::{Request, Router, Response, StatusCode};
///
/// let mut router = Router::new();
///
/// router.get("/healthz", |_req| async { Response::new(StatusCode::Ok) });
///
/// router.post("/predict", |req: Request| async move {
///     Response::new(StatusCode::Ok).body(format!("{} bytes", req.body().len()))
/// });
/// ```
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty routing table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nextword::Router;
    ///
    /// let router = Router::new();
    /// assert!(router.is_empty());
    /// ```
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a handler for `GET` requests to `path`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use nextword::{Router, Response, StatusCode};
    ///
    /// let mut router = Router::new();
    /// router.get("/healthz", |_req| async { Response::new(StatusCode::Ok) });
    /// ```
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Get, path, handler);
    }

    /// Register a handler for `POST` requests to `path`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use nextword::{Router, Response, StatusCode};
    ///
    /// let mut router = Router::new();
    /// router.post("/predict", |_req| async { Response::new(StatusCode::Ok) });
    /// ```
    pub fn post(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Post, path, handler);
    }

    // Store the handler type-erased so routes of different closures coexist.
    fn add_route(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        let handler: Handler = Arc::new(move |req| handler.call(req));
        self.routes.push(Route {
            method,
            path: normalize(path).to_owned(),
            handler,
        });
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` when no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes `request` to the first matching handler.
    ///
    /// Falls back to `405` (with an `Allow` header naming the methods the
    /// path does accept) or `404` when nothing matches.
    pub async fn route(&self, request: Request) -> Response {
        let path = normalize(request.path()).to_owned();

        if let Some(route) = self
            .routes
            .iter()
            .find(|r| r.path == path && &r.method == request.method())
        {
            return (route.handler)(request).await;
        }

        let allowed: Vec<&str> = self
            .routes
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.method.as_str())
            .collect();

        if allowed.is_empty() {
            Response::new(StatusCode::NotFound)
        } else {
            Response::new(StatusCode::MethodNotAllowed).header("Allow", allowed.join(", "))
        }
    }
}
