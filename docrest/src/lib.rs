//! Main docrest crate providing a unified interface for schema-validated document storage.
//!
//! This crate is the primary entry point for users of the docrest framework.
//! It re-exports the core types and functionality from the sub-crates and provides
//! convenient access to the storage backends.
//!
//! # Features
//!
//! - **Schema-validated entities** - Declare a [`schema::Schema`] once and every write is checked against it
//! - **Generic CRUD** - [`service::CrudService`] handles create, read, list, update, and delete for any entity
//! - **Multiple backends** - In-memory and MongoDB storage behind one object-safe trait
//! - **Search and pagination** - Case-insensitive search over declared fields with skip/limit windows
//!
//! # Quick Start
//!
//! ```ignore
//! use docrest::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! static NOTE_SCHEMA: Schema = Schema::new(&[FieldSpec::string("body")]);
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Note {
//!     pub body: String,
//! }
//!
//! impl Entity for Note {
//!     fn collection_name() -> &'static str { "notes" }
//!     fn schema() -> &'static Schema { &NOTE_SCHEMA }
//!     fn search_fields() -> &'static [&'static str] { &["body"] }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let notes = CrudService::<Note>::new(store.clone());
//!
//!     let created = notes.create(json!({ "body": "hello" })).await?;
//!     let page = notes.page(&ListParams::default().with_search("HELLO")).await?;
//!     assert_eq!(page.items[0].id, created.id);
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - `mongodb` - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use docrest_core::{backend, collection, entity, error, page, query, schema, service, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docrest_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docrest_mongodb::{MongoDbStore, MongoDbStoreBuilder, query::escape_regex};
}
