//! Declarative entity schemas and validation of inbound JSON payloads.
//!
//! A [`Schema`] is a static list of [`FieldSpec`]s. Each field declares its type,
//! whether it is required, and its constraints: lower/upper bounds for integers, a
//! set of permitted literals for enumerated strings, or a nested sub-schema for
//! composite records.
//!
//! Schemas are built entirely from `const fn`s so they can live in `static`s:
//!
//! ```ignore
//! use docrest_core::schema::{FieldSpec, Schema};
//!
//! static ATTACK: [FieldSpec; 2] = [
//!     FieldSpec::integer("pistol").at_least(0),
//!     FieldSpec::integer("bomb").at_least(0),
//! ];
//!
//! static PLAYER: Schema = Schema::new(&[
//!     FieldSpec::string("name"),
//!     FieldSpec::enumeration("status", &["Scull", "Ripple", "Jail"]),
//!     FieldSpec::object("attack", &ATTACK),
//! ]);
//! ```
//!
//! Validation never mutates its input and reports the first violation found.

use serde_json::{Map, Value};

use crate::error::{Constraint, ValidationError};

/// Keys managed by the store. Callers may never supply them on create.
pub const RESERVED_FIELDS: [&str; 4] = ["id", "_id", "created_at", "updated_at"];

/// Field name reported when the payload itself is not an object.
const ROOT: &str = "payload";

/// The type and constraints of a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Any string.
    String,
    /// A signed 64-bit integer with optional inclusive bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// A string restricted to the given literals.
    Enumeration(&'static [&'static str]),
    /// A nested record validated against its own field list.
    Object(&'static [FieldSpec]),
}

/// Declaration of one field of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn string(name: &'static str) -> Self {
        Self { name, kind: FieldKind::String, required: true }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Integer { min: None, max: None }, required: true }
    }

    pub const fn enumeration(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, kind: FieldKind::Enumeration(values), required: true }
    }

    pub const fn object(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, kind: FieldKind::Object(fields), required: true }
    }

    /// Marks the field as optional. Absent and `null` values are then accepted.
    pub const fn optional(self) -> Self {
        Self { required: false, ..self }
    }

    /// Sets an inclusive lower bound. Has no effect on non-integer fields.
    pub const fn at_least(self, min: i64) -> Self {
        match self.kind {
            FieldKind::Integer { max, .. } => Self {
                kind: FieldKind::Integer { min: Some(min), max },
                ..self
            },
            _ => self,
        }
    }

    /// Sets an inclusive upper bound. Has no effect on non-integer fields.
    pub const fn at_most(self, max: i64) -> Self {
        match self.kind {
            FieldKind::Integer { min, .. } => Self {
                kind: FieldKind::Integer { min, max: Some(max) },
                ..self
            },
            _ => self,
        }
    }
}

/// The full field list of an entity type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Looks up a top-level field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Validates a complete payload, as supplied on create.
    ///
    /// Every required field must be present, no undeclared or reserved field may appear,
    /// and every value must satisfy its field's constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        check_object(self.fields, as_object(value, ROOT)?, "", true)
    }

    /// Validates a partial payload, as supplied on update.
    ///
    /// Only the supplied fields are checked. A nested record is still validated as a whole,
    /// since merging replaces it entirely.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate_patch(&self, value: &Value) -> Result<(), ValidationError> {
        check_object(self.fields, as_object(value, ROOT)?, "", false)
    }
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new(path, Constraint::NotAnObject))
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_object(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    prefix: &str,
    complete: bool,
) -> Result<(), ValidationError> {
    for key in object.keys() {
        if prefix.is_empty() && RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(ValidationError::new(key.as_str(), Constraint::Reserved));
        }
        if !fields.iter().any(|spec| spec.name == key) {
            return Err(ValidationError::new(join(prefix, key), Constraint::Unknown));
        }
    }

    for spec in fields {
        let path = join(prefix, spec.name);

        match object.get(spec.name) {
            None if complete && spec.required => {
                return Err(ValidationError::new(path, Constraint::Required));
            }
            Some(Value::Null) if spec.required => {
                return Err(ValidationError::new(path, Constraint::Required));
            }
            None | Some(Value::Null) => {}
            Some(value) => check_value(spec, value, &path)?,
        }
    }

    Ok(())
}

fn check_value(spec: &FieldSpec, value: &Value, path: &str) -> Result<(), ValidationError> {
    match spec.kind {
        FieldKind::String => {
            if !value.is_string() {
                return Err(ValidationError::new(path, Constraint::Type("string")));
            }
        }
        FieldKind::Integer { min, max } => {
            let number = value
                .as_i64()
                .ok_or_else(|| ValidationError::new(path, Constraint::Type("integer")))?;

            if let Some(min) = min.filter(|min| number < *min) {
                return Err(ValidationError::new(path, Constraint::Minimum(min)));
            }
            if let Some(max) = max.filter(|max| number > *max) {
                return Err(ValidationError::new(path, Constraint::Maximum(max)));
            }
        }
        FieldKind::Enumeration(values) => {
            let literal = value
                .as_str()
                .ok_or_else(|| ValidationError::new(path, Constraint::Type("string")))?;

            if !values.contains(&literal) {
                return Err(ValidationError::new(path, Constraint::OneOf(values)));
            }
        }
        FieldKind::Object(fields) => {
            check_object(fields, as_object(value, path)?, path, true)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static GEAR: [FieldSpec; 2] = [
        FieldSpec::integer("pistol").at_least(0),
        FieldSpec::integer("bomb").at_least(0),
    ];

    static PLAYER: Schema = Schema::new(&[
        FieldSpec::string("name"),
        FieldSpec::integer("rank").at_least(0).at_most(100),
        FieldSpec::enumeration("status", &["Scull", "Ripple", "Jail"]),
        FieldSpec::object("gear", &GEAR),
        FieldSpec::string("nickname").optional(),
    ]);

    fn player() -> Value {
        json!({
            "name": "Alice",
            "rank": 1,
            "status": "Scull",
            "gear": { "pistol": 1, "bomb": 0 },
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        assert_eq!(PLAYER.validate(&player()), Ok(()));
    }

    #[test]
    fn test_optional_field_may_be_null() {
        let mut payload = player();
        payload["nickname"] = Value::Null;
        assert_eq!(PLAYER.validate(&payload), Ok(()));
    }

    #[test]
    fn test_missing_required_field() {
        let mut payload = player();
        payload.as_object_mut().unwrap().remove("name");

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::new("name", Constraint::Required));
    }

    #[test]
    fn test_negative_integer_rejected() {
        let mut payload = player();
        payload["rank"] = json!(-1);

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err.field, "rank");
        assert_eq!(err.constraint, Constraint::Minimum(0));
    }

    #[test]
    fn test_upper_bound_rejected() {
        let mut payload = player();
        payload["rank"] = json!(101);

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err.constraint, Constraint::Maximum(100));
    }

    #[test]
    fn test_undeclared_enum_value_rejected() {
        let mut payload = player();
        payload["status"] = json!("Prison");

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err.field, "status");
        assert!(matches!(err.constraint, Constraint::OneOf(_)));
        assert!(err.to_string().contains("Scull, Ripple, Jail"));
    }

    #[test]
    fn test_nested_violation_reports_dotted_path() {
        let mut payload = player();
        payload["gear"]["bomb"] = json!(-3);

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::new("gear.bomb", Constraint::Minimum(0)));
    }

    #[test]
    fn test_nested_record_must_be_object() {
        let mut payload = player();
        payload["gear"] = json!([1, 2]);

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::new("gear", Constraint::NotAnObject));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut payload = player();
        payload["rank"] = json!("first");

        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err.constraint, Constraint::Type("integer"));

        payload["rank"] = json!(1.5);
        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err.constraint, Constraint::Type("integer"));
    }

    #[test]
    fn test_unknown_and_reserved_fields_rejected() {
        let mut payload = player();
        payload["colour"] = json!("red");
        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::new("colour", Constraint::Unknown));

        let mut payload = player();
        payload["created_at"] = json!("2024-01-01T00:00:00Z");
        let err = PLAYER.validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::new("created_at", Constraint::Reserved));
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let err = PLAYER.validate(&json!([player()])).unwrap_err();
        assert_eq!(err.constraint, Constraint::NotAnObject);
    }

    #[test]
    fn test_patch_checks_only_supplied_fields() {
        assert_eq!(PLAYER.validate_patch(&json!({ "rank": 5 })), Ok(()));
        assert_eq!(PLAYER.validate_patch(&json!({})), Ok(()));

        let err = PLAYER.validate_patch(&json!({ "status": "Free" })).unwrap_err();
        assert_eq!(err.field, "status");

        let err = PLAYER.validate_patch(&json!({ "name": null })).unwrap_err();
        assert_eq!(err, ValidationError::new("name", Constraint::Required));
    }

    #[test]
    fn test_patch_validates_nested_record_whole() {
        let err = PLAYER
            .validate_patch(&json!({ "gear": { "pistol": 2 } }))
            .unwrap_err();
        assert_eq!(err, ValidationError::new("gear.bomb", Constraint::Required));
    }

    #[test]
    fn test_field_lookup() {
        assert!(PLAYER.field("status").is_some());
        assert!(PLAYER.field("missing").is_none());
        assert_eq!(PLAYER.fields().len(), 5);
    }
}
