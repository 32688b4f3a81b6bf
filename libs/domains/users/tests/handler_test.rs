//! Handler tests for the Users domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization and validation
//! - Response serialization
//! - HTTP status codes and error bodies
//!
//! The router runs against the in-memory repository, without the outer
//! `/api` nesting or middleware.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> Router {
    let service = UserService::new(
        InMemoryUserRepository::new(),
        Arc::new(LoggingVerificationSender),
    );
    handlers::router(service)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, email: &str, username: &str) -> UserCreated {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "email": email, "username": username, "password": "secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_user_returns_201() {
    let app = app();

    let created = create(&app, "alice@example.com", "alice").await;

    assert_eq!(created.id, 1);
    assert_eq!(created.message, "User created successfully");
}

#[tokio::test]
async fn test_create_user_invalid_email_returns_400_with_details() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "email": "not-an-email", "username": "alice", "password": "secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.code, 1001);
    let details = body.details.unwrap();
    assert!(details.get("email").is_some());
}

#[tokio::test]
async fn test_create_user_padded_email_is_stored_normalized() {
    let app = app();
    let created = create(&app, "  Carol@Example.COM ", "carol").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.email, "carol@example.com");

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "email": "carol@example.com", "username": "other", "password": "secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_missing_field_returns_422() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({ "email": "a@b.com" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_user_duplicate_email_returns_409() {
    let app = app();
    create(&app, "a@b.com", "first").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "email": "A@B.com", "username": "second", "password": "secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "email already registered");
}

#[tokio::test]
async fn test_list_users_returns_all() {
    let app = app();
    create(&app, "a@b.com", "a").await;
    create(&app, "c@d.com", "c").await;

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let users: Vec<UserResponse> = json_body(response.into_body()).await;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "a");
}

#[tokio::test]
async fn test_get_user_by_id_and_username() {
    let app = app();
    let created = create(&app, "alice@example.com", "alice").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["username"], "alice");
    assert!(body.get("password_hash").is_none());

    let response = app.oneshot(empty_request("GET", "/alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.id, created.id);
}

#[tokio::test]
async fn test_get_unknown_user_returns_404() {
    let response = app()
        .oneshot(empty_request("GET", "/999999"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.code, 1004);
    assert!(body.message.contains("999999"));
}

#[tokio::test]
async fn test_update_user_returns_message() {
    let app = app();
    let created = create(&app, "a@b.com", "old").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "username": "newname" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User updated successfully");

    let response = app.oneshot(empty_request("GET", "/newname")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_empty_username_returns_400() {
    let app = app();
    let created = create(&app, "a@b.com", "old").await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "username": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_non_numeric_id_returns_400() {
    let response = app()
        .oneshot(json_request("PUT", "/alice", json!({ "username": "bob" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.code, 1002);
}

#[tokio::test]
async fn test_delete_user_twice_returns_404() {
    let app = app();
    let created = create(&app, "a@b.com", "alice").await;
    let uri = format!("/{}", created.id);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User removed successfully");

    let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
