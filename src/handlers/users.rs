use crate::core::error::UserError;
use crate::core::state::AppState;
use crate::models::api::{
    CredentialsRequest, SuccessResponse, UpdateProfileRequest, UserListResponse, UserResponse,
};
use crate::services::user_service::UserService;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Run a service call on the blocking pool; the file store does synchronous I/O
async fn with_service<T, F>(state: &AppState, op: F) -> Result<T, UserError>
where
    F: FnOnce(&UserService) -> Result<T, UserError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.user_service);

    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| UserError::Internal(e.to_string()))?
}

/// Register a new user
///
/// POST /users
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response, UserError> {
    let Json(body) = body?;
    let user = with_service(&state, move |service| {
        service.register(&body.username, &body.password)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

/// Check credentials and return the matching user
///
/// POST /auth
pub async fn authenticate_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, UserError> {
    let Json(body) = body?;
    let user = with_service(&state, move |service| {
        service.authenticate(&body.username, &body.password)
    })
    .await?;

    Ok(Json(user.into()))
}

/// GET /users
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserListResponse>, UserError> {
    let users = with_service(&state, |service| service.list_users()).await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /users/{id}
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, UserError> {
    let user = with_service(&state, move |service| service.get_profile(&user_id)).await?;

    Ok(Json(user.into()))
}

/// PUT /users/{id}/profile
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, UserError> {
    let Json(body) = body?;
    let user = with_service(&state, move |service| {
        service.update_profile(&user_id, &body.message)
    })
    .await?;

    Ok(Json(user.into()))
}

/// DELETE /users/{id}
pub async fn delete_account_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse>, UserError> {
    with_service(&state, move |service| service.delete_account(&user_id)).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "Account deleted successfully".to_string(),
    }))
}
