//! Error types and result types for document store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.
//! Schema violations are reported as [`ValidationError`], which names the offending
//! field and the constraint it broke.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A stored document is missing bookkeeping fields or has an invalid structure.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A query uses an operator with a value it cannot apply to.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// Inbound data failed schema validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl DocumentStoreError {
    /// Returns `true` when the error was caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DocumentStoreError::Validation(_))
    }
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

/// A single schema violation.
///
/// `field` is a dotted path for nested records (e.g. `attack.pistol`).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("field `{field}` {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self { field: field.into(), constraint }
    }
}

/// The rule a [`ValidationError`] refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// A required field is absent or null.
    Required,
    /// The field is not declared by the schema.
    Unknown,
    /// The field is managed by the store and may not be supplied.
    Reserved,
    /// The value has the wrong type; carries the expected type name.
    Type(&'static str),
    /// The integer is below the declared lower bound.
    Minimum(i64),
    /// The integer is above the declared upper bound.
    Maximum(i64),
    /// The string is not one of the declared literals.
    OneOf(&'static [&'static str]),
    /// The payload (or a nested record) is not a JSON object.
    NotAnObject,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "is required"),
            Constraint::Unknown => write!(f, "is not a known field"),
            Constraint::Reserved => write!(f, "is assigned by the store and must not be supplied"),
            Constraint::Type(expected) => write!(f, "must be of type {expected}"),
            Constraint::Minimum(min) => write!(f, "must be greater than or equal to {min}"),
            Constraint::Maximum(max) => write!(f, "must be less than or equal to {max}"),
            Constraint::OneOf(values) => write!(f, "must be one of {}", values.join(", ")),
            Constraint::NotAnObject => write!(f, "must be an object"),
        }
    }
}
