use crate::core::error::ValidationError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PROFILE_MSG_LENGTH: usize = 500;

/// Validate a username
///
/// Surrounding whitespace is ignored for the length and character checks.
/// Allowed characters are ASCII letters, digits and underscore.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::InvalidUsername(
            "username is required".to_string(),
        ));
    }

    let username = username.trim();
    let len = username.chars().count();

    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "username must be at least {} characters long",
            MIN_USERNAME_LENGTH
        )));
    }

    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "username must be no more than {} characters long",
            MAX_USERNAME_LENGTH
        )));
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidUsername(
            "username can only contain letters, numbers, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Validate a password (length only, counted in characters)
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "password is required".to_string(),
        ));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Validate a profile message. The empty message is allowed.
pub fn validate_profile_message(message: &str) -> Result<(), ValidationError> {
    if message.chars().count() > MAX_PROFILE_MSG_LENGTH {
        return Err(ValidationError::InvalidProfileMessage(format!(
            "profile message must be no more than {} characters",
            MAX_PROFILE_MSG_LENGTH
        )));
    }

    Ok(())
}
