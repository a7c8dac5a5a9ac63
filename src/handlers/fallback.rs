use crate::models::api::ErrorResponse;
use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

pub async fn fallback_handler(method: Method, uri: Uri) -> Response {
    debug!(%method, %uri, "No route matched");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!(
                "No endpoint for {} {}. Valid endpoints: /users, /users/{{id}}, /users/{{id}}/profile, /auth, /health",
                method,
                uri.path()
            ),
        }),
    )
        .into_response()
}
