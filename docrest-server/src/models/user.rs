use docrest::entity::Entity;
use docrest::schema::{FieldSpec, Schema};
use serde::{Deserialize, Serialize};

pub const STATUS_VALUES: &[&str] = &["Scull", "Ripple", "Jail"];
pub const APPROVAL_VALUES: &[&str] = &["Approved", "Pending", "Rejected"];

static ATTACK_FIELDS: [FieldSpec; 3] = [
    FieldSpec::integer("pistol").at_least(0),
    FieldSpec::integer("bomb").at_least(0),
    FieldSpec::integer("dynamite").at_least(0),
];

static USER_SCHEMA: Schema = Schema::new(&[
    FieldSpec::integer("og_code").at_least(0).optional(),
    FieldSpec::string("name"),
    FieldSpec::string("title"),
    FieldSpec::integer("rank").at_least(0),
    FieldSpec::integer("points").at_least(0),
    FieldSpec::object("attack", &ATTACK_FIELDS),
    FieldSpec::integer("defence").at_least(0),
    FieldSpec::enumeration("status", STATUS_VALUES),
    FieldSpec::integer("matches").at_least(0),
    FieldSpec::integer("won").at_least(0),
    FieldSpec::enumeration("approval", APPROVAL_VALUES),
    FieldSpec::string("profile_image"),
]);

/// Weapon counts carried by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub pistol: i64,
    pub bomb: i64,
    pub dynamite: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Scull,
    Ripple,
    Jail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approval {
    Approved,
    Pending,
    Rejected,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_code: Option<i64>,
    pub name: String,
    pub title: String,
    pub rank: i64,
    pub points: i64,
    pub attack: Attack,
    pub defence: i64,
    pub status: UserStatus,
    pub matches: i64,
    pub won: i64,
    pub approval: Approval,
    pub profile_image: String,
}

impl Entity for User {
    fn collection_name() -> &'static str {
        "users"
    }

    fn schema() -> &'static Schema {
        &USER_SCHEMA
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "title", "status"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrest::entity::EntityExt;
    use docrest::error::{Constraint, ValidationError};
    use serde_json::json;

    fn alice() -> serde_json::Value {
        json!({
            "name": "Alice",
            "title": "Capt",
            "rank": 1,
            "points": 0,
            "attack": { "pistol": 1, "bomb": 0, "dynamite": 0 },
            "defence": 2,
            "status": "Scull",
            "matches": 0,
            "won": 0,
            "approval": "Pending",
            "profile_image": "x",
        })
    }

    #[test]
    fn test_schema_accepts_reference_payload() {
        assert_eq!(User::schema().validate(&alice()), Ok(()));

        let user = User::from_json(alice()).unwrap();
        assert_eq!(user.status, UserStatus::Scull);
        assert_eq!(user.og_code, None);
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_schema_rejects_bad_literals_and_negatives() {
        let mut payload = alice();
        payload["approval"] = json!("Maybe");
        assert_eq!(
            User::schema().validate(&payload),
            Err(ValidationError::new("approval", Constraint::OneOf(APPROVAL_VALUES)))
        );

        let mut payload = alice();
        payload["attack"]["dynamite"] = json!(-1);
        assert_eq!(
            User::schema().validate(&payload),
            Err(ValidationError::new("attack.dynamite", Constraint::Minimum(0)))
        );
    }

    #[test]
    fn test_enum_literals_match_schema() {
        for literal in STATUS_VALUES {
            assert!(serde_json::from_value::<UserStatus>(json!(literal)).is_ok());
        }
        for literal in APPROVAL_VALUES {
            assert!(serde_json::from_value::<Approval>(json!(literal)).is_ok());
        }
    }
}
