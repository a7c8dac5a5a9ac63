use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::time;

/// A registered user as persisted by the repository
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Time-ordered UUID, assigned once
    pub id: String,
    pub username: String,
    /// Hex digest of the password
    pub password_hash: String,
    #[serde(default)]
    pub profile_msg: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = time::now();
        Self {
            id: generate_id(),
            username: username.into(),
            password_hash: password_hash.into(),
            profile_msg: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the profile message and bump `updated_at`
    ///
    /// No validation happens here; `UserService` checks the message first.
    pub fn update_profile(&mut self, message: impl Into<String>) {
        self.profile_msg = message.into();
        self.updated_at = time::advance_from(self.updated_at);
    }
}

fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_user() {
        let user = User::new("testuser", "hashedpassword");

        assert_eq!(user.username, "testuser");
        assert_eq!(user.password_hash, "hashedpassword");
        assert!(!user.id.is_empty());
        assert!(user.profile_msg.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_update_profile() {
        let mut user = User::new("testuser", "hash");
        let created_at = user.created_at;

        user.update_profile("Hello, world!");

        assert_eq!(user.profile_msg, "Hello, world!");
        assert!(user.updated_at > created_at);
        assert_eq!(user.created_at, created_at);
    }

    #[test]
    fn test_updated_at_advances_on_every_update() {
        let mut user = User::new("testuser", "hash");
        let mut previous = user.updated_at;

        for i in 0..100 {
            user.update_profile(format!("message {}", i));
            assert!(user.updated_at > previous);
            previous = user.updated_at;
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| User::new("u", "h").id).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ids_are_concurrently_unique() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..250).map(|_| User::new("u", "h").id).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(ids.len(), 2000);
    }

    #[test]
    fn test_json_field_names() {
        let user = User::new("alice", "abc123");
        let value = serde_json::to_value(&user).unwrap();
        let object = value.as_object().unwrap();

        for field in ["id", "username", "password_hash", "profile_msg", "created_at", "updated_at"] {
            assert!(object.contains_key(field), "missing field {}", field);
        }
        assert_eq!(object.len(), 6);

        // RFC 3339 text, not a number
        assert!(object["created_at"].is_string());
    }
}
