use axum::Router;

pub mod health;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest("/users", users::router(state))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use domain_users::LoggingVerificationSender;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn in_memory_state() -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: None,
                smtp: None,
                frontend_url: "http://localhost:3000".to_string(),
                server: ServerConfig::default(),
                environment: Environment::Development,
            },
            db: None,
            sender: Arc::new(LoggingVerificationSender),
        }
    }

    fn app(state: AppState) -> Router {
        let router = axum_helpers::create_router::<crate::openapi::ApiDoc>(
            routes(&state),
            &state.config.server,
            &state.config.environment,
        )
        .unwrap();
        router.merge(ready_router(state))
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_users_mounted_under_api() {
        let app = app(in_memory_state());

        let create = Request::post("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"email":"alice@example.com","username":"alice","password":"secret"}"#,
            ))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(Request::get("/api/users/alice").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn test_ready_without_database() {
        let response = app(in_memory_state())
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["database"], "in-memory");
    }

    #[tokio::test]
    async fn test_openapi_lists_user_paths() {
        let response = app(in_memory_state())
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = json(response).await;
        assert!(doc["paths"].get("/users").is_some());
        assert!(doc["paths"].get("/users/{id}").is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app(in_memory_state())
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["code"], 1004);
    }
}
