// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::handlers::health::health_handler))

        // Accounts
        .route(
            "/users",
            post(crate::handlers::users::register_handler)
                .get(crate::handlers::users::list_users_handler),
        )
        .route("/auth", post(crate::handlers::users::authenticate_handler))
        .route(
            "/users/{id}",
            get(crate::handlers::users::get_profile_handler)
                .delete(crate::handlers::users::delete_account_handler),
        )
        .route(
            "/users/{id}/profile",
            put(crate::handlers::users::update_profile_handler),
        )

        // JSON 404 for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::stores::memory_store::MemoryUserRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let config = Config::from_toml("[storage]\nbackend = \"memory\"\n").unwrap();
        let state = AppState::new(config, Arc::new(MemoryUserRepository::new()));
        build_router(Arc::new(state))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_full_account_flow() {
        let router = create_test_router();

        let (status, user) = send(
            &router,
            json_request(
                "POST",
                "/users",
                serde_json::json!({"username": "alice", "password": "secretpw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = user["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &router,
            json_request(
                "POST",
                "/auth",
                serde_json::json!({"username": "alice", "password": "secretpw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, updated) = send(
            &router,
            json_request(
                "PUT",
                &format!("/users/{}/profile", id),
                serde_json::json!({"message": "hi"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["profile_msg"], "hi");

        let (status, list) = send(
            &router,
            Request::builder().uri("/users").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["users"].as_array().unwrap().len(), 1);

        let (status, _) = send(
            &router,
            Request::builder()
                .method("DELETE")
                .uri(format!("/users/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &router,
            Request::builder()
                .uri(format!("/users/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "user not found");
    }

    #[tokio::test]
    async fn test_bad_request_bodies_use_error_envelope() {
        let router = create_test_router();

        let (status, body) = send(
            &router,
            json_request("POST", "/users", serde_json::json!({"username": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("password"));

        let (status, body) = send(
            &router,
            Request::builder()
                .method("POST")
                .uri("/auth")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, body) = send(
            &router,
            Request::builder()
                .method("PUT")
                .uri("/users/some-id/profile")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health_route() {
        let router = create_test_router();

        let (status, body) = send(
            &router,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = create_test_router();

        let (status, body) = send(
            &router,
            Request::builder().uri("/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
