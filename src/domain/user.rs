use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a client may never set through a registration payload.
pub const RESERVED_PROFILE_FIELDS: &[&str] = &["_id", "role"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
        }
    }
}

/// A student record. `role` is absent for plain students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl CreateUser {
    /// Profile data with identity and role fields removed.
    pub fn sanitized_profile(&self) -> Map<String, Value> {
        self.profile
            .iter()
            .filter(|(key, _)| !RESERVED_PROFILE_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Payload accepted by the token endpoint. Only `email` ends up in the claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
