//! # docket
//!
//! A minimal in-memory document registry served over HTTP.
//!
//! Clients create, list, fetch, update and delete documents, each identified
//! by a server-assigned sequential id. State lives in process memory and is
//! gone on restart.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | `POST` | `/documents/` | 201 + document | 422 |
//! | `GET` | `/documents/` | 200 + list | — |
//! | `GET` | `/documents/{id}` | 200 + document | 404 |
//! | `PUT` | `/documents/{id}` | 200 + document | 404, 422 |
//! | `DELETE` | `/documents/{id}` | 204 | 404 |
//!
//! The pieces:
//!
//! - [`Registry`] — the service; a cheap-to-clone handle over a
//!   [`DocumentStore`] that handlers receive explicitly
//! - [`DocumentInput`] — validated `{name, owner, type}` payloads
//! - [`Router`] / [`Server`] — radix-tree routing via [`matchit`], hyper
//!   underneath, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use docket::{Registry, Server, routes};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = routes::router(Registry::in_memory());
//!     Server::bind("0.0.0.0:8000").unwrap().serve(app).await.unwrap();
//! }
//! ```

mod config;
mod document;
mod error;
mod handler;
mod method;
mod registry;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod health;
pub mod routes;

pub use config::Config;
pub use document::{
    Document, DocumentId, DocumentInput, DocumentType, FieldError, InvalidDocumentType,
    MAX_TEXT_LEN, MIN_TEXT_LEN, Reason, ValidationErrors,
};
pub use error::{Error, ServiceError};
pub use handler::{Handler, with_state};
pub use method::Method;
pub use registry::Registry;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{DocumentStore, InMemoryStore};
