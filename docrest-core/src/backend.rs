//! Storage backend abstraction for the document store.
//!
//! [`StoreBackend`] is the collaborator interface the CRUD service talks to. It is
//! deliberately small: single-document writes, lookups by identifier, filtered
//! queries, and counts. Identifiers are assigned by the backend on insert.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends. It is object safe, so the
//!   composition root can hold whichever backend the configuration selects as
//!   `Arc<dyn StoreBackend>`.
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use docrest_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! let id = backend.insert_document(doc! { "name": "Alice" }, "users").await?;
//! let stored = backend.get_document(id, "users").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, DateTime, Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and tolerate concurrent calls from many
/// request handlers. Each method is a single atomic operation on one document
/// (or a read over many); no multi-document transactions are implied.
///
/// # Documents
///
/// Documents returned by a backend always include the `_id` field.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document and returns the identifier the store assigned to it.
    ///
    /// Any `_id` present in `document` is ignored.
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId>;

    /// Retrieves one document by identifier, or `None` if it does not exist.
    async fn get_document(
        &self,
        id: ObjectId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>>;

    /// Returns the documents matching `query`, honouring its sort, offset, and limit.
    ///
    /// A missing collection yields an empty result.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Merges `patch` into an existing document (field-level overwrite).
    ///
    /// When `touch` is given, its field is refreshed in the same atomic write as
    /// described on [`Touch`]. Returns the document as it is after the update, or `None`
    /// if no document has that identifier. Read-back happens atomically with the write.
    async fn update_document(
        &self,
        id: ObjectId,
        patch: Document,
        touch: Option<Touch<'_>>,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>>;

    /// Permanently removes a document. Returns `true` if a document was deleted.
    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<bool>;

    /// Counts documents matching `filter`, or every document when `filter` is `None`.
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }

    /// Releases connections and other resources held by the backend.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// A timestamp field refreshed by an update.
///
/// Stored datetimes have millisecond precision, so the new value is the later of `at` and
/// one millisecond past the stored value. The field strictly increases on every update,
/// even when several land within the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch<'a> {
    pub field: &'a str,
    pub at: DateTime,
}

impl<'a> Touch<'a> {
    pub fn new(field: &'a str, at: DateTime) -> Self {
        Self { field, at }
    }

    /// Touches `field` with the current time.
    pub fn now(field: &'a str) -> Self {
        Self::new(field, DateTime::now())
    }

    /// The value to store given the field's current value.
    ///
    /// Anything other than a datetime (including a missing field) is replaced by `at`.
    pub fn next(&self, previous: Option<&Bson>) -> DateTime {
        match previous {
            Some(Bson::DateTime(previous)) => DateTime::from_millis(
                self.at
                    .timestamp_millis()
                    .max(previous.timestamp_millis().saturating_add(1)),
            ),
            _ => self.at,
        }
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
