//! The document store handle shared by every service in a process.
//!
//! A [`DocumentStore`] wraps one backend behind an `Arc`, so cloning it is cheap and
//! every clone talks to the same connection pool. It is constructed once by the
//! application's composition root and passed explicitly to whatever needs it.
//!
//! # Example
//!
//! ```ignore
//! use docrest_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let users = store.collection("users");
//! let total = users.count(None).await?;
//! store.shutdown().await?;
//! ```

use std::sync::Arc;

use crate::{backend::StoreBackend, collection::Collection, error::DocumentStoreResult};

#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Arc<dyn StoreBackend>,
}

impl DocumentStore {
    /// Creates a new document store owning the given backend.
    pub fn new<B: StoreBackend + 'static>(backend: B) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Creates a document store from an already shared backend.
    pub fn from_arc(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Returns a handle bound to the named collection.
    pub fn collection(&self, name: impl Into<String>) -> Collection<'_> {
        Collection::new(name.into(), self.backend.as_ref())
    }

    /// Checks that the backend is reachable.
    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.backend.ping().await
    }

    /// Releases the backend's resources. Other clones of this handle must not be used afterwards.
    pub async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}
