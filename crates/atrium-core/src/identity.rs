use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A portal user as returned by the backend.
///
/// Produced by `atrium-auth` (login response, stored session blob),
/// consumed by the UI layer and the role predicates.
///
/// The backend is inconsistent about role shape: some endpoints attach a
/// scalar `role`, others a `roles` array, and either position may carry a
/// bare name or a full role record. Both fields are kept verbatim here;
/// `atrium_auth::roles::normalize_roles` resolves the precedence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Account status; the backend only emits `"active"` or `"inactive"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    /// Scalar role, used when the user carries exactly one role.
    #[serde(default)]
    pub role: Option<RoleValue>,
    /// Role array; takes precedence over `role` when non-empty.
    #[serde(default)]
    pub roles: Option<Vec<RoleValue>>,
}

/// One role position on a [`User`].
///
/// The backend serializes roles either as a bare name (`"student"`) or as
/// the full role record its ORM relationship produces
/// (`{"id": 3, "name": "Student"}`). Untagged so both parse transparently.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum RoleValue {
    Name(String),
    Record {
        #[serde(default)]
        id: Option<i64>,
        name: String,
    },
}

impl RoleValue {
    /// The string form used for membership checks.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(name) | Self::Record { name, .. } => name,
        }
    }
}

impl From<&str> for RoleValue {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// PATCH-style profile update: every field optional, absent means "leave
/// unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UserPatch {
    /// True when no field is set — applying it would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
            && self.status.is_none()
    }

    /// Merge this patch into `user`, field by field.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(status) = &self.status {
            user.status = Some(status.clone());
        }
    }
}
