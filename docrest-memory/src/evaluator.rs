//! Query expression evaluation for in-memory document filtering.
//!
//! This module provides the evaluation engine for query expressions,
//! enabling filtering and comparison operations on BSON documents.

use bson::{Bson, Document, datetime::DateTime, oid::ObjectId};
use std::{cmp::Ordering, collections::HashMap};

use docrest_core::{
    error::DocumentStoreError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so that an `Int32` filter value matches an
/// `Int64` stored value.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    /// All integers and floats normalized to f64
    Number(f64),
    DateTime(DateTime),
    ObjectId(ObjectId),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            _ => Comparable::Null,
        }
    }
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Comparable<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a.bytes().partial_cmp(&b.bytes()),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Resolves a possibly dotted field path (`attack.name`) against a document.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = current.as_document()?.get(segment)?;
    }

    Some(current)
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<bool, DocumentStoreError> {
        self.visit_expr(expr)
    }

    pub fn matches(document: &'a Document, expr: Option<&Expr>) -> bool {
        match expr {
            Some(expr) => DocumentEvaluator::new(document).evaluate(expr).unwrap_or(false),
            None => true,
        }
    }
}

impl QueryVisitor for DocumentEvaluator<'_> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = lookup(self.document, field) else {
            return Ok(false);
        };

        Ok(match op {
            FieldOp::Eq => Comparable::from(field_value) == Comparable::from(value),
            FieldOp::Contains => match (Comparable::from(field_value), Comparable::from(value)) {
                (Comparable::String(left), Comparable::String(right)) => {
                    left.to_lowercase().contains(&right.to_lowercase())
                }
                (Comparable::Array(array), needle) => array.iter().any(|item| item == &needle),
                _ => false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use docrest_core::query::Filter;

    fn player() -> Document {
        doc! {
            "name": "Alice Ripple",
            "status": "Jail",
            "rank": 3_i64,
            "attack": { "name": "Smash", "power": 9_i64 },
            "tags": ["left", "drive"],
        }
    }

    #[test]
    fn test_eq_normalizes_numbers() {
        let document = player();
        assert!(DocumentEvaluator::matches(&document, Some(&Filter::eq("rank", 3))));
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::eq("rank", 4))));
    }

    #[test]
    fn test_contains_ignores_case() {
        let document = player();
        assert!(DocumentEvaluator::matches(&document, Some(&Filter::contains("name", "rIPPLE"))));
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::contains("name", "bob"))));
    }

    #[test]
    fn test_contains_on_array_is_membership() {
        let document = player();
        assert!(DocumentEvaluator::matches(&document, Some(&Filter::contains("tags", "drive"))));
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::contains("tags", "lob"))));
    }

    #[test]
    fn test_dotted_paths_reach_nested_fields() {
        let document = player();
        assert!(DocumentEvaluator::matches(&document, Some(&Filter::eq("attack.name", "Smash"))));
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::eq("attack.speed", 1))));
    }

    #[test]
    fn test_or_and_combinations() {
        let document = player();
        let any = Filter::or([Filter::contains("name", "zzz"), Filter::contains("status", "jail")]);
        let all = Filter::and([Filter::contains("name", "zzz"), Filter::contains("status", "jail")]);

        assert!(DocumentEvaluator::matches(&document, Some(&any)));
        assert!(!DocumentEvaluator::matches(&document, Some(&all)));
        assert!(DocumentEvaluator::matches(&document, None));
    }

    #[test]
    fn test_object_ids_order_by_creation() {
        let first = Bson::ObjectId(ObjectId::new());
        let second = Bson::ObjectId(ObjectId::new());

        assert_eq!(
            Comparable::from(&first).partial_cmp(&Comparable::from(&second)),
            Some(Ordering::Less)
        );
    }
}
