//! Error types.
//!
//! [`Error`] covers infrastructure failures (bad listen address, socket I/O)
//! and never reaches a client. [`ServiceError`] is what a registry operation
//! can fail with, and knows how to render itself as an HTTP response.

use std::net::AddrParseError;

use tracing::debug;

use crate::document::{DocumentId, ValidationErrors};
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by [`Server`](crate::Server).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid listen address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a registry operation was refused.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("document {0} not found")]
    NotFound(DocumentId),

    /// A well-formed integer that can never be a document id.
    #[error("no document can have id `{0}`")]
    UnknownId(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        debug!(error = %self, "request refused");
        match self {
            Self::NotFound(_) | Self::UnknownId(_) => {
                Response::detail(Status::NotFound, "Document not found")
            }
            Self::Validation(errors) => Response::builder()
                .status(Status::UnprocessableContent)
                .json(&errors),
        }
    }
}
