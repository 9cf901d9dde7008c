//! Generic CRUD operations over one entity type.
//!
//! [`CrudService`] maps typed entities onto store operations for a single collection.
//! It validates inbound data against the entity's schema, stamps the bookkeeping
//! timestamps, and turns stored documents back into [`Record`]s. It holds no state of
//! its own besides the store handle: every call round-trips to the backend.
//!
//! Malformed identifiers are not errors. Lookups, updates, and deletes with an id that
//! is not a valid ObjectId report the same absent result as an id that does not exist.
//!
//! # Example
//!
//! ```ignore
//! use docrest_core::{page::ListParams, service::CrudService};
//! use serde_json::json;
//!
//! let users = CrudService::<User>::new(store.clone());
//! let created = users.create(json!({ "name": "Alice", /* ... */ })).await?;
//! let fetched = users.get_by_id(&created.id).await?;
//! let page = users.page(&ListParams::default().with_search("ripple")).await?;
//! ```

use bson::{Bson, DateTime, Document, oid::ObjectId, ser::serialize_to_bson};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, warn};

use crate::{
    backend::Touch,
    collection::Collection,
    entity::{CREATED_AT_FIELD, Entity, EntityExt, ID_FIELD, Record, UPDATED_AT_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    page::{ListParams, Page, Pagination},
    query::{Expr, Filter, Query, SortDirection},
    schema::RESERVED_FIELDS,
    store::DocumentStore,
};

pub struct CrudService<E: Entity> {
    store: DocumentStore,
    collection: String,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            collection: self.collection.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> CrudService<E> {
    /// Creates a service over `E::collection_name()`.
    pub fn new(store: DocumentStore) -> Self {
        Self::with_collection(store, E::collection_name())
    }

    /// Creates a service over an explicitly named collection.
    pub fn with_collection(store: DocumentStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            _marker: PhantomData,
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    fn collection(&self) -> Collection<'_> {
        self.store.collection(self.collection.as_str())
    }

    /// Validates a raw JSON payload and inserts it as a new entity.
    ///
    /// The payload must not contain `id`, `_id`, `created_at`, or `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Validation`] if the payload breaks the schema, or a
    /// backend error if the write fails.
    pub async fn create(&self, data: Value) -> DocumentStoreResult<Record<E>> {
        E::schema()
            .validate(&data)
            .inspect_err(|err| warn!(collection = %self.collection, error = %err, "rejected create payload"))?;

        self.insert(E::from_json(data)?).await
    }

    /// Validates a typed entity and inserts it.
    pub async fn create_entity(&self, entity: E) -> DocumentStoreResult<Record<E>> {
        entity.validate()?;
        self.insert(entity).await
    }

    async fn insert(&self, entity: E) -> DocumentStoreResult<Record<E>> {
        let mut document = into_document(entity.to_bson()?)?;
        let now = DateTime::now();
        document.insert(CREATED_AT_FIELD, now);
        document.insert(UPDATED_AT_FIELD, now);

        let id = self.collection().insert(document).await?;
        debug!(collection = %self.collection, %id, "created document");

        Ok(Record {
            id: id.to_hex(),
            created_at: now.to_chrono(),
            updated_at: now.to_chrono(),
            data: entity,
        })
    }

    /// Fetches one entity. Returns `None` for malformed or unknown identifiers.
    pub async fn get_by_id(&self, id: &str) -> DocumentStoreResult<Option<Record<E>>> {
        let Some(oid) = parse_id(id) else {
            debug!(collection = %self.collection, id, "ignoring malformed id");
            return Ok(None);
        };

        self.collection()
            .get(oid)
            .await?
            .map(Record::from_document)
            .transpose()
    }

    /// Returns one window of entities in creation order, optionally filtered by search.
    ///
    /// A non-blank search term matches entities where any of [`Entity::search_fields`]
    /// contains the term, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Validation`] if `skip` or `limit` is out of range.
    pub async fn list(&self, params: &ListParams) -> DocumentStoreResult<Vec<Record<E>>> {
        params.validate()?;

        let query = Query::builder()
            .maybe_filter(params.search_term().and_then(search_filter::<E>))
            .offset(params.skip as usize)
            .limit(params.limit as usize)
            .sort(ID_FIELD, SortDirection::Asc)
            .build();

        let records = self
            .collection()
            .query(query)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        debug!(collection = %self.collection, returned = records.len(), "listed documents");
        Ok(records)
    }

    /// Total number of entities in the collection, ignoring any search or window.
    pub async fn count(&self) -> DocumentStoreResult<u64> {
        self.collection().count(None).await
    }

    /// Lists one window together with its page metadata.
    ///
    /// `pagination.total` is [`CrudService::count`], so it does not reflect the search term.
    pub async fn page(&self, params: &ListParams) -> DocumentStoreResult<Page<Record<E>>> {
        let items = self.list(params).await?;
        let total = self.count().await?;

        Ok(Page::new(
            items,
            Pagination::new(params.skip as u64, params.limit as u64, total),
        ))
    }

    /// Merges the supplied fields into an entity and refreshes `updated_at`.
    ///
    /// Identifier and timestamp keys in `data` are ignored. Returns `None` for malformed or
    /// unknown identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Validation`] if a supplied field breaks the schema.
    pub async fn update(&self, id: &str, data: Value) -> DocumentStoreResult<Option<Record<E>>> {
        let Some(oid) = parse_id(id) else {
            debug!(collection = %self.collection, id, "ignoring malformed id");
            return Ok(None);
        };

        let data = without_reserved(data);
        E::schema()
            .validate_patch(&data)
            .inspect_err(|err| warn!(collection = %self.collection, %oid, error = %err, "rejected update payload"))?;

        let patch = into_document(serialize_to_bson(&data)?)?;

        let updated = self
            .collection()
            .update(oid, patch, Some(Touch::now(UPDATED_AT_FIELD)))
            .await?;
        debug!(collection = %self.collection, %oid, found = updated.is_some(), "updated document");

        updated.map(Record::from_document).transpose()
    }

    /// Permanently deletes an entity. Returns `false` for malformed or unknown identifiers.
    pub async fn delete(&self, id: &str) -> DocumentStoreResult<bool> {
        let Some(oid) = parse_id(id) else {
            debug!(collection = %self.collection, id, "ignoring malformed id");
            return Ok(false);
        };

        let deleted = self.collection().delete(oid).await?;
        debug!(collection = %self.collection, %oid, deleted, "deleted document");
        Ok(deleted)
    }

    /// Returns every entity whose `field` equals `value`, in creation order.
    pub async fn find_by_field(
        &self,
        field: &str,
        value: impl Into<Bson>,
    ) -> DocumentStoreResult<Vec<Record<E>>> {
        let query = Query::builder()
            .filter(Filter::eq(field, value))
            .sort(ID_FIELD, SortDirection::Asc)
            .build();

        self.collection()
            .query(query)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }
}

fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn search_filter<E: Entity>(term: &str) -> Option<Expr> {
    let fields = E::search_fields();
    if fields.is_empty() {
        return None;
    }

    Some(Filter::or(
        fields.iter().map(|field| Filter::contains(*field, term)),
    ))
}

fn without_reserved(mut data: Value) -> Value {
    if let Some(object) = data.as_object_mut() {
        object.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
    }
    data
}

fn into_document(bson: Bson) -> DocumentStoreResult<Document> {
    match bson {
        Bson::Document(document) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a document, found {other:?}"
        ))),
    }
}
