//! The HTTP status codes this service answers with.
//!
//! ```rust
//! use docket::{Response, Status};
//!
//! Response::status(Status::NoContent);
//!
//! async fn gone(_req: docket::Request) -> Status {
//!     Status::NotFound
//! }
//! ```

use http::StatusCode;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                   // 200
    Created,              // 201
    NoContent,            // 204

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,           // 400
    NotFound,             // 404
    MethodNotAllowed,     // 405
    UnprocessableContent, // 422

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,  // 500
}

impl From<Status> for StatusCode {
    fn from(s: Status) -> StatusCode {
        match s {
            Status::Ok                   => StatusCode::OK,
            Status::Created              => StatusCode::CREATED,
            Status::NoContent            => StatusCode::NO_CONTENT,
            Status::BadRequest           => StatusCode::BAD_REQUEST,
            Status::NotFound             => StatusCode::NOT_FOUND,
            Status::MethodNotAllowed     => StatusCode::METHOD_NOT_ALLOWED,
            Status::UnprocessableContent => StatusCode::UNPROCESSABLE_ENTITY,
            Status::InternalServerError  => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        StatusCode::from(s).as_u16()
    }
}
