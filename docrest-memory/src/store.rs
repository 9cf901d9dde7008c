//! In-memory storage implementation for document stores.
//!
//! Documents live in per-collection HashMaps keyed by the hex form of their ObjectId,
//! guarded by a single async-safe read-write lock.

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use mea::rwlock::RwLock;
use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use docrest_core::{
    backend::{StoreBackend, StoreBackendBuilder, Touch},
    entity::ID_FIELD,
    error::DocumentStoreResult,
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator, lookup};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones share
/// the same data. Queries scan every document in a collection; there is no indexing.
///
/// # Example
///
/// ```ignore
/// use docrest_memory::InMemoryStore;
/// use docrest_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(doc! { "name": "Alice" }, "users").await?;
/// let stored = store.get_document(id, "users").await?;
/// assert!(stored.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (hex id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    ///
    /// ```ignore
    /// let store = InMemoryStore::builder().build().await?;
    /// ```
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}

fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    let left = lookup(a, field).map(Comparable::from).unwrap_or(Comparable::Null);
    let right = lookup(b, field).map(Comparable::from).unwrap_or(Comparable::Null);

    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(
        &self,
        mut document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD, id);

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_hex(), document);

        Ok(id)
    }

    async fn get_document(
        &self,
        id: ObjectId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        Ok(self
            .store
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(&id.to_hex()))
            .cloned())
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut documents = collection_map
            .values()
            .filter(|doc| DocumentEvaluator::matches(doc, query.filter.as_ref()))
            .collect::<Vec<_>>();

        if let Some(sort) = &query.sort {
            documents.sort_by(|a, b| match sort.direction {
                SortDirection::Asc => compare_field(a, b, &sort.field),
                SortDirection::Desc => compare_field(b, a, &sort.field),
            });
        }

        Ok(documents
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn update_document(
        &self,
        id: ObjectId,
        patch: Document,
        touch: Option<Touch<'_>>,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        let mut store = self.store.write().await;
        let Some(document) = store
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(&id.to_hex()))
        else {
            return Ok(None);
        };

        for (key, value) in patch {
            if key != ID_FIELD {
                document.insert(key, value);
            }
        }

        if let Some(touch) = touch {
            let stamp = touch.next(document.get(touch.field));
            document.insert(touch.field, stamp);
        }

        Ok(Some(document.clone()))
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<bool> {
        Ok(self
            .store
            .write()
            .await
            .get_mut(collection)
            .and_then(|documents| documents.remove(&id.to_hex()))
            .is_some())
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(0);
        };

        Ok(collection_map
            .values()
            .filter(|doc| DocumentEvaluator::matches(doc, filter.as_ref()))
            .count() as u64)
    }

    async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.store.write().await.clear();
        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
