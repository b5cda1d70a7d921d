//! Health-check handlers.
//!
//! | Endpoint | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic, and how much does it hold? |

use serde::Serialize;

use crate::registry::Registry;
use crate::request::Request;
use crate::response::{Json, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub documents: usize,
}

/// `200 OK` with the number of documents currently registered.
pub async fn readiness(registry: Registry, _req: Request) -> Json<Readiness> {
    Json(Readiness { status: "ready", documents: registry.len() })
}
