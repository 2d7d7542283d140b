//! User Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::UserUuid;

/// Account roles, indexed by the `role` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

impl UserRole {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl From<UserRole> for satchel::IndexValue {
    fn from(role: UserRole) -> Self {
        Self::Text(role.as_str().to_string())
    }
}

/// User Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserUuid,
    /// Unique per account, enforced by the `email` index.
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: Timestamp,
}

/// New User Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: UserUuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}
