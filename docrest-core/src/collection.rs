//! Store operations bound to a single collection.
//!
//! A [`Collection`] borrows the backend from a [`DocumentStore`](crate::store::DocumentStore)
//! and forwards each call with its collection name filled in. It works on raw BSON
//! documents; typing and validation are layered on top by the CRUD service.

use bson::{Document, oid::ObjectId};

use crate::{
    backend::{StoreBackend, Touch},
    error::DocumentStoreResult,
    query::{Expr, Query},
};

#[derive(Debug)]
pub struct Collection<'a> {
    name: String,
    backend: &'a dyn StoreBackend,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(name: String, backend: &'a dyn StoreBackend) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a new document and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the write fails.
    pub async fn insert(&self, document: Document) -> DocumentStoreResult<ObjectId> {
        self.backend.insert_document(document, self.name()).await
    }

    /// Retrieves one document by identifier.
    pub async fn get(&self, id: ObjectId) -> DocumentStoreResult<Option<Document>> {
        self.backend.get_document(id, self.name()).await
    }

    /// Queries documents using a structured query.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<Document>> {
        self.backend.query_documents(query, self.name()).await
    }

    /// Merges `patch` into a document, refreshes the `touch` field if any, and returns the
    /// updated document.
    pub async fn update(
        &self,
        id: ObjectId,
        patch: Document,
        touch: Option<Touch<'_>>,
    ) -> DocumentStoreResult<Option<Document>> {
        self.backend.update_document(id, patch, touch, self.name()).await
    }

    /// Deletes a document, returning `true` if one was removed.
    pub async fn delete(&self, id: ObjectId) -> DocumentStoreResult<bool> {
        self.backend.delete_document(id, self.name()).await
    }

    /// Counts documents matching `filter` (all documents when `None`).
    pub async fn count(&self, filter: Option<Expr>) -> DocumentStoreResult<u64> {
        self.backend.count_documents(filter, self.name()).await
    }
}
