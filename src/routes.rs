//! The `/documents` HTTP surface.

use crate::document::{Document, DocumentId, DocumentInput, FieldError, Reason, ValidationErrors};
use crate::error::ServiceError;
use crate::handler::with_state;
use crate::health;
use crate::method::Method;
use crate::registry::Registry;
use crate::request::Request;
use crate::response::{Json, Response};
use crate::router::Router;
use crate::status::Status;

/// Builds the application router around `registry`.
///
/// The collection is reachable both with and without a trailing slash.
pub fn router(registry: Registry) -> Router {
    let mut app = Router::new();
    for collection in ["/documents", "/documents/"] {
        app = app
            .on(Method::Get, collection, with_state(registry.clone(), list_documents))
            .on(Method::Post, collection, with_state(registry.clone(), create_document));
    }
    app.on(Method::Get, "/documents/{id}", with_state(registry.clone(), get_document))
        .on(Method::Put, "/documents/{id}", with_state(registry.clone(), update_document))
        .on(Method::Delete, "/documents/{id}", with_state(registry.clone(), delete_document))
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz", with_state(registry, health::readiness))
}

// POST /documents/ → 201 + Document
async fn create_document(registry: Registry, req: Request) -> Result<Response, ServiceError> {
    let input = DocumentInput::from_json(req.body())?;
    let doc = registry.create(input);
    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &format!("/documents/{}", doc.id))
        .json(&doc))
}

// GET /documents/ → 200 + [Document]
async fn list_documents(registry: Registry, _req: Request) -> Json<Vec<Document>> {
    Json(registry.list())
}

// GET /documents/{id} → 200 + Document
async fn get_document(registry: Registry, req: Request) -> Result<Json<Document>, ServiceError> {
    let id = document_id(&req)?.resolve()?;
    Ok(Json(registry.get(id)?))
}

// PUT /documents/{id} → 200 + Document
//
// Path and body are validated together, before the id is looked up.
async fn update_document(registry: Registry, req: Request) -> Result<Json<Document>, ServiceError> {
    let (id, input) = match (document_id(&req), DocumentInput::from_json(req.body())) {
        (Ok(id), Ok(input)) => (id, input),
        (id, input) => {
            let mut errors = ValidationErrors::default();
            if let Err(e) = id {
                errors.extend(e);
            }
            if let Err(e) = input {
                errors.extend(e);
            }
            return Err(errors.into());
        }
    };
    Ok(Json(registry.update(id.resolve()?, input)?))
}

// DELETE /documents/{id} → 204
async fn delete_document(registry: Registry, req: Request) -> Result<Status, ServiceError> {
    let id = document_id(&req)?.resolve()?;
    registry.delete(id)?;
    Ok(Status::NoContent)
}

/// A path id that parsed as an integer. Integers no document can carry
/// (negative, or past `u64::MAX`) are kept so they answer 404, not 422.
enum PathId {
    Id(DocumentId),
    Unassignable(String),
}

impl PathId {
    fn resolve(self) -> Result<DocumentId, ServiceError> {
        match self {
            Self::Id(id) => Ok(id),
            Self::Unassignable(raw) => Err(ServiceError::UnknownId(raw)),
        }
    }
}

fn document_id(req: &Request) -> Result<PathId, ValidationErrors> {
    let raw = req.param("id").unwrap_or_default();
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(PathId::Id(DocumentId::new(id)));
    }
    if is_integer(raw) {
        return Ok(PathId::Unassignable(raw.to_owned()));
    }
    Err(ValidationErrors::single(FieldError::new(
        &["path", "document_id"],
        Reason::IntParsing,
        "Input should be a valid integer, unable to parse string as an integer",
    )))
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_syntax() {
        assert!(is_integer("-3"));
        assert!(is_integer("99999999999999999999"));
        assert!(!is_integer("-"));
        assert!(!is_integer("1.5"));
        assert!(!is_integer("abc"));
    }
}
