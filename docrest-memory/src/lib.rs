//! In-memory document storage backend for docrest.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development,
//! tests, and running the HTTP service without a database.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Store-assigned identifiers** - Every insert receives a fresh ObjectId
//! - **Full query support** - Equality and case-insensitive substring filters, sorting, and pagination
//!
//! # Quick Start
//!
//! ```ignore
//! use docrest::{memory::InMemoryStore, store::DocumentStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     let store = DocumentStore::new(backend);
//!
//!     let id = store.collection("users").insert(doc! { "name": "Alice" }).await?;
//!     assert!(store.collection("users").get(id).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docrest_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
