//! Core traits for typed entities and their conversion to and from stored documents.
//!
//! An [`Entity`] is the domain portion of a stored document: everything except the
//! store-assigned identifier and the bookkeeping timestamps. Those live on [`Record`],
//! which is what the CRUD service hands back to callers.

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    schema::Schema,
};

/// Name of the store-assigned identifier field.
pub const ID_FIELD: &str = "_id";
/// Name of the creation timestamp field.
pub const CREATED_AT_FIELD: &str = "created_at";
/// Name of the update timestamp field.
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Core trait that all entities served by a CRUD service must implement.
///
/// # Example
///
/// ```ignore
/// use docrest_core::{entity::Entity, schema::{FieldSpec, Schema}};
/// use serde::{Serialize, Deserialize};
///
/// static NOTE_SCHEMA: Schema = Schema::new(&[FieldSpec::string("body")]);
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Note {
///     pub body: String,
/// }
///
/// impl Entity for Note {
///     fn collection_name() -> &'static str { "notes" }
///     fn schema() -> &'static Schema { &NOTE_SCHEMA }
///     fn search_fields() -> &'static [&'static str] { &["body"] }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this entity is stored in.
    fn collection_name() -> &'static str;

    /// Returns the declarative schema inbound data is validated against.
    fn schema() -> &'static Schema;

    /// String fields matched by free-text search. Empty disables search filtering.
    fn search_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Extension trait providing conversion and validation utilities for entities.
///
/// Automatically implemented for every [`Entity`].
pub trait EntityExt: Entity {
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;

    fn to_json(&self) -> DocumentStoreResult<Value>;

    fn from_json(value: Value) -> DocumentStoreResult<Self>;

    /// Checks this value against [`Entity::schema`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Validation`] naming the offending field.
    fn validate(&self) -> DocumentStoreResult<()>;
}

impl<E: Entity> EntityExt for E {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }

    fn validate(&self) -> DocumentStoreResult<()> {
        Ok(E::schema().validate(&self.to_json()?)?)
    }
}

/// A materialized entity: the store-assigned identifier, the bookkeeping timestamps,
/// and the domain fields flattened alongside them.
///
/// Serializes to JSON as `{ "id": "...", "created_at": "...", "updated_at": "...", ...fields }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Record<E> {
    /// Opaque identifier (the hex form of the store's ObjectId).
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: E,
}

impl<E: Entity> Record<E> {
    /// Splits a stored document into its bookkeeping fields and the entity body.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the identifier or a timestamp is
    /// missing or mistyped, or a serialization error if the body does not match `E`.
    pub fn from_document(mut document: Document) -> DocumentStoreResult<Self> {
        let id = match document.remove(ID_FIELD) {
            Some(Bson::ObjectId(id)) => id,
            other => {
                return Err(DocumentStoreError::InvalidDocument(format!(
                    "expected ObjectId in `{ID_FIELD}`, found {other:?}"
                )));
            }
        };
        let created_at = take_timestamp(&mut document, CREATED_AT_FIELD)?;
        let updated_at = take_timestamp(&mut document, UPDATED_AT_FIELD)?;

        Ok(Self {
            id: id.to_hex(),
            created_at,
            updated_at,
            data: E::from_bson(Bson::Document(document))?,
        })
    }
}

fn take_timestamp(document: &mut Document, field: &str) -> DocumentStoreResult<DateTime<Utc>> {
    match document.remove(field) {
        Some(Bson::DateTime(value)) => Ok(value.to_chrono()),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected datetime in `{field}`, found {other:?}"
        ))),
    }
}
