//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Every request that goes
//! through [`Router::handle`] is logged once with its method, path, status
//! and latency.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::info;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router. Build it once at startup and hand it to
/// [`Server::serve`](crate::Server::serve), or drive it directly with
/// [`Router::handle`].
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with a route already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Routes one request and produces one response.
    ///
    /// Unknown paths get `404`; a known path under another method gets `405`
    /// with an `allow` header.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let routed = Method::try_from(&parts.method)
            .ok()
            .and_then(|method| self.lookup(method, &path));

        let response = match routed {
            Some((handler, params)) => handler.call(Request::new(body, params)).await,
            None => self.fallback(&path),
        };

        info!(
            method = %parts.method,
            path = %path,
            status = response.status_code(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "request"
        );
        response
    }

    /// Matches on the raw path; parameters are percent-decoded afterwards so
    /// an encoded `/` cannot change which route is chosen.
    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some((handler, params))
    }

    fn fallback(&self, path: &str) -> Response {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();

        if allowed.is_empty() {
            return Response::detail(Status::NotFound, "Not Found");
        }

        allowed.sort();
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        let mut response = Response::detail(Status::MethodNotAllowed, "Method Not Allowed");
        response.push_header("allow", &allow);
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
