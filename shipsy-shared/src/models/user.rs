/// User model
///
/// Users are created on signup and never updated or deleted afterwards.
/// Their `id` and `username` are copied into every shipment they create
/// (see [`crate::models::shipment::CreatedBy`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(64) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```
/// use shipsy_shared::models::user::User;
///
/// let user = User::new("alice", "$argon2id$...".to_string());
/// assert_eq!(user.username, "alice");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash is
/// skipped during serialization so a `User` can never leak it in a response.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique and case-sensitive
    pub username: String,

    /// Argon2id password hash (PHC string)
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user record with a fresh ID and creation timestamp
    pub fn new(username: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash,
            created_at: super::now_micros(),
        }
    }
}

/// Public view of a user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Login name
    pub username: String,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_gets_unique_id() {
        let a = User::new("alice", "hash".to_string());
        let b = User::new("alice", "hash".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("alice", "$argon2id$secret".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "alice");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_profile_from_user() {
        let user = User::new("bob", "hash".to_string());
        let profile = Profile::from(&user);
        assert_eq!(profile.username, "bob");
    }
}
