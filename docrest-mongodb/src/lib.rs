//! MongoDB backend implementation for docrest.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! giving persistent document storage on top of MongoDB's own query engine.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docrest = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Native filtering** - Filters, sorting, and pagination run inside MongoDB
//! - **Atomic updates** - Partial updates return the post-update document in one round-trip
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use docrest::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "my_database")
//!         .server_selection_timeout(Duration::from_secs(5))
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docrest_mongodb;

pub mod query;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
