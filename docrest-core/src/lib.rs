//! Core building blocks for serving a schema-validated document collection over CRUD operations.
//!
//! This crate is the heart of the docrest project and provides:
//!
//! - **Entity traits** ([`entity`]) - Typed documents bound to a collection and a schema
//! - **Entity schemas** ([`schema`]) - Declarative field definitions and validation
//! - **Store backend abstraction** ([`backend`]) - The collaborator interface every document store implements
//! - **Query and filtering API** ([`query`]) - A small filter AST interpreted by each backend
//! - **Store handle** ([`store`]) - An explicitly constructed, cheaply clonable handle to a backend
//! - **Collections interface** ([`collection`]) - Store operations bound to one collection name
//! - **CRUD service** ([`service`]) - Generic create/read/update/delete/search over one entity type
//! - **Pagination** ([`page`]) - List parameters and page metadata
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use docrest_core::{entity::Entity, schema::{FieldSpec, Schema}};
//! use serde::{Serialize, Deserialize};
//!
//! static TEAM_SCHEMA: Schema = Schema::new(&[
//!     FieldSpec::string("name"),
//!     FieldSpec::integer("size").at_least(1),
//! ]);
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Team {
//!     pub name: String,
//!     pub size: i64,
//! }
//!
//! impl Entity for Team {
//!     fn collection_name() -> &'static str { "teams" }
//!     fn schema() -> &'static Schema { &TEAM_SCHEMA }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docrest_core;

pub mod backend;
pub mod collection;
pub mod entity;
pub mod error;
pub mod page;
pub mod query;
pub mod schema;
pub mod service;
pub mod store;
