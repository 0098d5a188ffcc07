//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_STORE_OWNER, ROLE_USER};
use crate::errors::AppError;

/// User roles enumeration.
///
/// A closed set: unknown role strings are rejected at the boundary instead
/// of being coerced to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    StoreOwner,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role may create and manage stores
    pub fn can_manage_stores(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::StoreOwner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::StoreOwner => ROLE_STORE_OWNER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            ROLE_USER => Ok(UserRole::User),
            ROLE_STORE_OWNER => Ok(UserRole::StoreOwner),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(AppError::validation(format!(
                "Invalid role '{}'. Must be one of: user, store_owner, admin",
                other
            ))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "Johnathan Doe")]
    pub name: String,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Optional postal address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// User role
    #[schema(example = "user")]
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::try_from("user").unwrap(), UserRole::User);
        assert_eq!(
            UserRole::try_from("store_owner").unwrap(),
            UserRole::StoreOwner
        );
        assert_eq!(UserRole::try_from("admin").unwrap(), UserRole::Admin);

        assert_eq!(UserRole::User.to_string(), "user");
        assert_eq!(UserRole::StoreOwner.to_string(), "store_owner");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::try_from("superuser").is_err());
        assert!(UserRole::try_from("").is_err());
    }

    #[test]
    fn only_admin_and_store_owner_manage_stores() {
        assert!(UserRole::Admin.can_manage_stores());
        assert!(UserRole::StoreOwner.can_manage_stores());
        assert!(!UserRole::User.can_manage_stores());
    }
}
