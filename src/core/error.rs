// Centralized error handling for the user profile service

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

use crate::models::api::ErrorResponse;

/// Input that breaks one of the username/password/profile rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username: {0}")]
    InvalidUsername(String),

    #[error("password: {0}")]
    InvalidPassword(String),

    #[error("profile_message: {0}")]
    InvalidProfileMessage(String),
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidUsername(_) => "username",
            ValidationError::InvalidPassword(_) => "password",
            ValidationError::InvalidProfileMessage(_) => "profile_message",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationError::InvalidUsername(m)
            | ValidationError::InvalidPassword(m)
            | ValidationError::InvalidProfileMessage(m) => m,
        }
    }
}

/// Errors raised by a `UserRepository` implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("failed to access user store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("user store {path} contains invalid data: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("user store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by `UserService` operations
#[derive(Error, Debug)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("user not found")]
    NotFound,

    #[error("user already exists")]
    AlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl UserError {
    pub fn storage(context: &'static str, source: StoreError) -> Self {
        UserError::Storage { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::Validation(_)
            | UserError::MissingField(_)
            | UserError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::AlreadyExists => StatusCode::CONFLICT,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::Storage { .. } | UserError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for UserError {
    fn from(rejection: JsonRejection) -> Self {
        UserError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            error!(error = %self, "Request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_field_and_message() {
        let err = ValidationError::InvalidUsername("username is required".to_string());
        assert_eq!(err.field(), "username");
        assert_eq!(err.message(), "username is required");
        assert_eq!(err.to_string(), "username: username is required");

        let err = ValidationError::InvalidProfileMessage("too long".to_string());
        assert_eq!(err.field(), "profile_message");
    }

    #[test]
    fn test_status_codes() {
        let validation = UserError::from(ValidationError::InvalidPassword("short".to_string()));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(UserError::MissingField("user_id").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UserError::InvalidBody("missing field `password`".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(UserError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(UserError::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(UserError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            UserError::storage("failed to list users", StoreError::LockPoisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(UserError::MissingField("user_id").to_string(), "user_id is required");
    }

    #[tokio::test]
    async fn test_internal_errors_are_redacted() {
        use http_body_util::BodyExt;

        let err = UserError::storage(
            "failed to create user",
            StoreError::io("/tmp/users.json", std::io::Error::other("disk full")),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Internal server error");
    }
}
