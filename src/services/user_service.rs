use crate::core::error::{StoreError, UserError};
use crate::models::user::User;
use crate::stores::repository::UserRepository;
use crate::utils::password::{hash_password, verify_password};
use crate::validation::user::{validate_password, validate_profile_message, validate_username};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// User registration, authentication and profile management
///
/// The repository is injected at construction so the same service runs on
/// the JSON file store in production and the in-memory store in tests.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    // Makes the exists-then-create pair in `register` atomic within the process
    registration: Mutex<()>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            registration: Mutex::new(()),
        }
    }

    /// Create a new account
    pub fn register(&self, username: &str, password: &str) -> Result<User, UserError> {
        validate_username(username)?;
        validate_password(password)?;

        let username = username.trim();

        // Holds no data, so a poisoned lock is still usable
        let _guard = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let exists = self
            .repo
            .exists(username)
            .map_err(|e| UserError::storage("failed to check user existence", e))?;

        if exists {
            warn!(username = %username, "Registration rejected, username taken");
            return Err(UserError::AlreadyExists);
        }

        let user = User::new(username, hash_password(password));

        self.repo
            .create(&user)
            .map_err(|e| UserError::storage("failed to create user", e))?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Verify credentials
    ///
    /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        validate_username(username)?;
        validate_password(password)?;

        let username = username.trim();

        let user = match self.repo.get_by_username(username) {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                debug!(username = %username, "Authentication failed, unknown user");
                return Err(UserError::InvalidCredentials);
            }
            Err(e) => {
                error!(username = %username, error = %e, "Authentication lookup failed");
                return Err(UserError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "Authentication failed, wrong password");
            return Err(UserError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User authenticated");

        Ok(user)
    }

    pub fn get_profile(&self, user_id: &str) -> Result<User, UserError> {
        if user_id.is_empty() {
            return Err(UserError::MissingField("user_id"));
        }

        self.fetch(user_id, "failed to get user")
    }

    /// Replace the profile message and return the updated user
    pub fn update_profile(&self, user_id: &str, message: &str) -> Result<User, UserError> {
        if user_id.is_empty() {
            return Err(UserError::MissingField("user_id"));
        }

        validate_profile_message(message)?;

        let mut user = self.fetch(user_id, "failed to get user")?;
        user.update_profile(message);

        self.repo.update(&user).map_err(|e| match e {
            // Deleted between the fetch and the update
            StoreError::NotFound(_) => UserError::NotFound,
            e => UserError::storage("failed to update user", e),
        })?;

        info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repo
            .list()
            .map_err(|e| UserError::storage("failed to list users", e))
    }

    pub fn delete_account(&self, user_id: &str) -> Result<(), UserError> {
        if user_id.is_empty() {
            return Err(UserError::MissingField("user_id"));
        }

        self.fetch(user_id, "failed to get user")?;

        self.repo.delete(user_id).map_err(|e| match e {
            StoreError::NotFound(_) => UserError::NotFound,
            e => UserError::storage("failed to delete user", e),
        })?;

        info!(user_id = %user_id, "Account deleted");

        Ok(())
    }

    fn fetch(&self, user_id: &str, context: &'static str) -> Result<User, UserError> {
        self.repo.get_by_id(user_id).map_err(|e| match e {
            StoreError::NotFound(_) => UserError::NotFound,
            e => UserError::storage(context, e),
        })
    }
}
