//! Document storage behind a lookup-by-key interface.
//!
//! [`Registry`](crate::Registry) only talks to [`DocumentStore`], so the
//! linear-scan [`InMemoryStore`] can be swapped for an indexed or persistent
//! backend without changing the service contract.

use crate::document::{Document, DocumentId};

/// Storage for documents, keyed by [`DocumentId`].
///
/// Implementations own the id counter: [`allocate_id`](Self::allocate_id)
/// must never hand out the same id twice, even after that id is removed.
pub trait DocumentStore: Send + Sync + 'static {
    /// Reserves the next id. Ids are strictly increasing.
    fn allocate_id(&mut self) -> DocumentId;

    /// Appends a document. The caller guarantees its id is fresh.
    fn insert(&mut self, doc: Document);

    fn get(&self, id: DocumentId) -> Option<Document>;

    /// All documents, in insertion order.
    fn list(&self) -> Vec<Document>;

    /// Replaces the document with the same id in place, keeping its
    /// position. Returns the previous version, or `None` (and stores
    /// nothing) if the id is unknown.
    fn replace(&mut self, doc: Document) -> Option<Document>;

    fn remove(&mut self, id: DocumentId) -> Option<Document>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered in-memory store. Lookups are a linear scan over a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: Vec<Document>,
    last_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }
}

impl DocumentStore for InMemoryStore {
    fn allocate_id(&mut self) -> DocumentId {
        self.last_id += 1;
        DocumentId::new(self.last_id)
    }

    fn insert(&mut self, doc: Document) {
        self.documents.push(doc);
    }

    fn get(&self, id: DocumentId) -> Option<Document> {
        self.position(id).map(|i| self.documents[i].clone())
    }

    fn list(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn replace(&mut self, doc: Document) -> Option<Document> {
        let i = self.position(doc.id)?;
        Some(std::mem::replace(&mut self.documents[i], doc))
    }

    fn remove(&mut self, id: DocumentId) -> Option<Document> {
        let i = self.position(id)?;
        Some(self.documents.remove(i))
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}
