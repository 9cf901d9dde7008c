//! Convenient re-exports of commonly used types from docrest.
//!
//! ```ignore
//! use docrest::prelude::*;
//! ```

pub use docrest_core::{
    backend::{StoreBackend, StoreBackendBuilder, Touch},
    collection::Collection,
    entity::{Entity, EntityExt, Record},
    error::{Constraint, DocumentStoreError, DocumentStoreResult, ValidationError},
    page::{ListParams, Page, Pagination},
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, QueryVisitor, Sort, SortDirection},
    schema::{FieldKind, FieldSpec, Schema},
    service::CrudService,
    store::DocumentStore,
};
