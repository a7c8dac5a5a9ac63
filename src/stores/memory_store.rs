use crate::core::error::StoreError;
use crate::models::user::User;
use crate::stores::repository::UserRepository;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory user repository, used by tests and the `memory` storage backend
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MemoryUserRepository {
    fn create(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.users
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Linear scan over all users
    fn get_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.users
            .iter()
            .find(|entry| entry.value().username == username)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    fn update(&self, user: &User) -> Result<(), StoreError> {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(user.clone());
                Ok(())
            }
            Entry::Vacant(_) => Err(StoreError::NotFound(user.id.clone())),
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.iter().map(|entry| entry.value().clone()).collect())
    }

    fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.users.iter().any(|entry| entry.value().username == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let repo = MemoryUserRepository::new();
        let user = User::new("alice", "hash");

        repo.create(&user).unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get_by_id(&user.id).unwrap(), user);
        assert_eq!(repo.get_by_username("alice").unwrap(), user);
        assert!(repo.exists("alice").unwrap());
        assert!(!repo.exists("Alice").unwrap());
    }

    #[test]
    fn test_missing_user() {
        let repo = MemoryUserRepository::new();

        assert!(matches!(repo.get_by_id("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(repo.get_by_username("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(repo.delete("nope"), Err(StoreError::NotFound(_))));

        let ghost = User::new("ghost", "hash");
        assert!(matches!(repo.update(&ghost), Err(StoreError::NotFound(_))));
        // A failed update must not insert
        assert!(repo.is_empty());
    }

    #[test]
    fn test_update_replaces_record() {
        let repo = MemoryUserRepository::new();
        let mut user = User::new("alice", "hash");
        repo.create(&user).unwrap();

        user.update_profile("hello");
        repo.update(&user).unwrap();

        assert_eq!(repo.get_by_id(&user.id).unwrap().profile_msg, "hello");
    }

    #[test]
    fn test_delete_and_list() {
        let repo = MemoryUserRepository::new();
        let alice = User::new("alice", "hash");
        let bob = User::new("bob", "hash");
        repo.create(&alice).unwrap();
        repo.create(&bob).unwrap();

        assert_eq!(repo.list().unwrap().len(), 2);

        repo.delete(&alice.id).unwrap();

        let users = repo.list().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "bob");
        assert!(!repo.exists("alice").unwrap());
    }

    #[test]
    fn test_returned_users_are_copies() {
        let repo = MemoryUserRepository::new();
        let user = User::new("alice", "hash");
        repo.create(&user).unwrap();

        let mut copy = repo.get_by_id(&user.id).unwrap();
        copy.update_profile("local change");

        assert_eq!(repo.get_by_id(&user.id).unwrap().profile_msg, "");
    }
}
