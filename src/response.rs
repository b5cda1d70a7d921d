//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`], or return anything that converts into one:
//! a [`Status`], a [`Json`] value, or a `Result` of two such types.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http_body_util::Full;
use serde::Serialize;
use tracing::{error, warn};

use crate::status::Status;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use docket::{Response, Status};
///
/// Response::json(&serde_json::json!({"id": 1}));
/// Response::text("ok");
/// Response::status(Status::NoContent);
///
/// Response::builder()
///     .status(Status::Created)
///     .header("location", "/documents/1")
///     .json(&serde_json::json!({"id": 1}));
/// ```
///
/// Headers are kept as plain strings until [`into_inner`](Response::into_inner)
/// so handlers never deal with `HeaderName` / `HeaderValue` parse errors; a
/// header that turns out to be invalid is logged and dropped there.
#[derive(Debug)]
pub struct Response {
    body: Bytes,
    headers: Vec<(String, String)>,
    status: Status,
}

impl Response {
    /// `200 OK` with `value` serialised as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::builder().json(value)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Bytes::new(), headers: Vec::new(), status: code }
    }

    /// `{"detail": message}` with the given status.
    pub fn detail(code: Status, message: &str) -> Self {
        #[derive(Serialize)]
        struct Detail<'a> {
            detail: &'a str,
        }
        Self::builder().status(code).json(&Detail { detail: message })
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn status_code(&self) -> u16 {
        self.status.into()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn push_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_owned(), value.to_owned()));
    }

    /// Converts into the hyper-facing response. `Full` is a body that is
    /// already entirely in memory, so hyper sends it with a `content-length`
    /// instead of chunked encoding.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status.into();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    res.headers_mut().append(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`]. Defaults to `200 OK`; finished by a
/// typed body method.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with `value` serialised as JSON. A value that cannot be
    /// serialised becomes a bodiless `500`.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(body) => self.finish(JSON, body),
            Err(e) => {
                error!("failed to serialise response body: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }

    /// Terminate with a plain-text body.
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT, body.into().into_bytes())
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body: Bytes::from(body), headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Anything a handler returns must implement this; the handler wrapper calls
/// it once the handler's future resolves. Implement it on your own types to
/// return them directly:
///
/// ```rust
/// use docket::{IntoResponse, Response, Status};
///
/// struct Refused;
///
/// impl IntoResponse for Refused {
///     fn into_response(self) -> Response {
///         Response::builder().status(Status::BadRequest).text("refused")
///     }
/// }
/// ```
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

/// A `200 OK` JSON body: `Ok(Json(document))`.
///
/// Serialisation happens in `into_response`, after the handler returns, so
/// handlers stay free of `serde_json` error handling.
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response { Response::json(&self.0) }
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `return Status::NoContent`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

/// Lets handlers use `?`: both the success and the error side render
/// themselves, e.g. `Result<Json<Document>, ServiceError>`.
impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_puts_content_type_first() {
        let res = Response::builder()
            .status(Status::Created)
            .header("location", "/documents/7")
            .json(&[1, 2, 3]);
        assert_eq!(res.status_code(), 201);
        assert_eq!(res.header("Content-Type"), Some("application/json"));
        assert_eq!(res.header("location"), Some("/documents/7"));
        assert_eq!(res.body(), b"[1,2,3]");

        let inner = res.into_inner();
        assert_eq!(inner.status(), http::StatusCode::CREATED);
        assert_eq!(inner.headers()["location"], "/documents/7");
    }

    #[test]
    fn invalid_headers_are_dropped() {
        let res = Response::builder().header("bad header", "x").text("body");
        let inner = res.into_inner();
        assert_eq!(inner.headers().len(), 1);
        assert!(inner.headers().contains_key("content-type"));
    }

    #[test]
    fn result_picks_the_matching_side() {
        let ok: Result<Status, Status> = Ok(Status::NoContent);
        let err: Result<Status, Status> = Err(Status::NotFound);
        assert_eq!(ok.into_response().status_code(), 204);
        assert_eq!(err.into_response().status_code(), 404);
    }
}
