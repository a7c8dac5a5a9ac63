use crate::core::error::StoreError;
use crate::models::user::User;

/// Persistence port for users
///
/// Implementations are keyed by user ID. Username uniqueness is NOT enforced
/// here; `UserService` checks `exists` before `create`.
pub trait UserRepository: Send + Sync {
    /// Insert a user under its ID
    fn create(&self, user: &User) -> Result<(), StoreError>;

    fn get_by_id(&self, id: &str) -> Result<User, StoreError>;

    /// First user whose username matches exactly (case-sensitive)
    fn get_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Replace an existing record; `NotFound` if the ID is unknown
    fn update(&self, user: &User) -> Result<(), StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;

    fn list(&self) -> Result<Vec<User>, StoreError>;

    fn exists(&self, username: &str) -> Result<bool, StoreError>;
}
