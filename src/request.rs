//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

/// An incoming request as a handler sees it: the fully-read body and the
/// path parameters the router resolved.
pub struct Request {
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(body: Bytes, params: HashMap<String, String>) -> Self {
        Self { body, params }
    }

    pub fn body(&self) -> &[u8] { &self.body }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/documents/{id}`, `req.param("id")` on `/documents/42`
    /// (or `/documents/%34%32`) returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
