use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account as held by the credential store.
///
/// Only the bcrypt hash of the password is kept. Users are never removed, deleting an
/// account sets `is_deleted`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(firstname: String, lastname: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            firstname,
            lastname,
            email,
            password_hash,
            is_deleted: false,
            created_at: Utc::now(),
        }
    }
}

/// Replacement values for a profile update. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user returned by the update endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub is_deleted: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            is_deleted: user.is_deleted,
        }
    }
}

/// Identity summary returned alongside a login token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub firstname: String,
    pub lastname: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new(
            "Ann".into(),
            "Lee".into(),
            "ann@x.com".into(),
            "$2b$10$hash".into(),
        );
        assert!(!user.is_deleted);
        assert_ne!(user.id, Uuid::nil());
    }

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User::new(
            "Ann".into(),
            "Lee".into(),
            "ann@x.com".into(),
            "$2b$10$hash".into(),
        );
        let json = serde_json::to_value(UserProfile::from(user)).unwrap();

        assert_eq!(json["email"], "ann@x.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }
}
