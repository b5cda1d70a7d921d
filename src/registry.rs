//! The document service: create, list, fetch, update and delete.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::document::{Document, DocumentId, DocumentInput};
use crate::error::ServiceError;
use crate::store::{DocumentStore, InMemoryStore};

/// Shared handle to the document registry.
///
/// Cloning is cheap (one `Arc`). Handlers receive a clone instead of
/// reaching for a global. Every operation takes the lock exactly once, so
/// each one is a single indivisible step even on a multi-threaded runtime.
#[derive(Clone)]
pub struct Registry(Arc<RwLock<dyn DocumentStore>>);

impl Registry {
    pub fn new<S: DocumentStore>(store: S) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    /// An empty registry backed by [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    /// Stores a new document under the next id and returns it.
    pub fn create(&self, input: DocumentInput) -> Document {
        let mut store = self.0.write();
        let id = store.allocate_id();
        let doc = Document::new(id, input);
        store.insert(doc.clone());
        info!(%id, name = %doc.name, "document created");
        doc
    }

    /// Every document, in insertion order.
    pub fn list(&self) -> Vec<Document> {
        self.0.read().list()
    }

    pub fn get(&self, id: DocumentId) -> Result<Document, ServiceError> {
        let doc = self.0.read().get(id);
        debug!(%id, found = doc.is_some(), "document lookup");
        doc.ok_or(ServiceError::NotFound(id))
    }

    /// Replaces the fields of an existing document. Id and position stay put.
    pub fn update(&self, id: DocumentId, input: DocumentInput) -> Result<Document, ServiceError> {
        let doc = Document::new(id, input);
        self.0
            .write()
            .replace(doc.clone())
            .ok_or(ServiceError::NotFound(id))?;
        info!(%id, "document updated");
        Ok(doc)
    }

    pub fn delete(&self, id: DocumentId) -> Result<(), ServiceError> {
        self.0.write().remove(id).ok_or(ServiceError::NotFound(id))?;
        info!(%id, "document deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentType;

    fn input(name: &str, doc_type: DocumentType) -> DocumentInput {
        DocumentInput::new(name, "Tester", doc_type).unwrap()
    }

    #[test]
    fn fresh_registry_is_empty() {
        let registry = Registry::in_memory();
        assert!(registry.list().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn update_preserves_id_and_changes_fields() {
        let registry = Registry::in_memory();
        let created = registry.create(input("Original", DocumentType::Pdf));

        let updated = registry
            .update(created.id, input("Updated", DocumentType::Word))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(registry.get(created.id).unwrap(), updated);
        assert_eq!(updated.doc_type, DocumentType::Word);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let registry = Registry::in_memory();
        let id = DocumentId::new(42);
        assert!(matches!(registry.get(id), Err(ServiceError::NotFound(i)) if i == id));
        assert!(matches!(
            registry.update(id, input("Nope", DocumentType::Pdf)),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(registry.delete(id), Err(ServiceError::NotFound(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn delete_removes_and_never_reuses_id() {
        let registry = Registry::in_memory();
        let a = registry.create(input("Alpha", DocumentType::Pdf));
        registry.delete(a.id).unwrap();
        assert!(registry.get(a.id).is_err());

        let b = registry.create(input("Beta", DocumentType::Pdf));
        assert!(b.id > a.id);
    }

    #[test]
    fn clones_share_state() {
        let registry = Registry::in_memory();
        let other = registry.clone();
        registry.create(input("Shared", DocumentType::Markdown));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let registry = Registry::in_memory();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| registry.create(input("Parallel", DocumentType::Html)).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(registry.len(), 200);
    }
}
