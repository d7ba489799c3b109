//! Authentication API Tests
//!
//! Request validation and token checks that resolve before any database work.

use axum::{
    body::Body,
    http::{header, Method, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use health_tracker::domain::UserRole;

use crate::common::{body_json, request, unique_email, TestApp};

/// Test registration fails with invalid email
#[tokio::test]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "not-an-email",
        "password": "ValidPassword123!",
        "first_name": "Test",
        "last_name": "User"
    });

    let response = app.post_json("/api/auth/register", &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "email");
}

/// Test registration fails with short password
#[tokio::test]
async fn test_register_with_short_password_fails() {
    let app = TestApp::new().await;
    let body = json!({
        "email": unique_email(),
        "password": "short"
    });

    let response = app.post_json("/api/auth/register", &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "password");
    assert_eq!(json["errors"][0]["message"], "Password must be at least 6 characters");
}

/// Test malformed JSON is reported in the API error format
#[tokio::test]
async fn test_login_with_malformed_json_fails() {
    let app = TestApp::new().await;
    let mut bad = request(Method::POST, "/api/auth/login", None, Body::from("{\"email\":"));
    bad.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    let response = app.send(bad).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 10002);
}

/// Test refresh requires a token value
#[tokio::test]
async fn test_refresh_with_empty_token_fails() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/auth/refresh", &json!({ "refresh_token": "" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Test accessing protected route without token
#[tokio::test]
async fn test_profile_without_token_fails() {
    let app = TestApp::new().await;

    let response = app.get("/api/auth/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], 10003);
    assert_eq!(json["message"], "Missing authorization header");
}

/// Test accessing protected route with invalid token
#[tokio::test]
async fn test_profile_with_invalid_token_fails() {
    let app = TestApp::new().await;

    let response = app.get_auth("/api/auth/profile", "invalid.token.here").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Tokens signed with another secret are rejected
#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let other = TestApp::with_settings(|s| {
        s.jwt.secret = "another-secret-that-is-long-enough-000000".into();
    })
    .await;
    let app = TestApp::new().await;
    let token = other.token_for(UserRole::User);

    let response = app.get_auth("/api/medications", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Non-bearer schemes are rejected
#[tokio::test]
async fn test_basic_auth_scheme_rejected() {
    let app = TestApp::new().await;
    let mut req = request(Method::GET, "/api/auth/profile", None, Body::empty());
    req.headers_mut().insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Basic dXNlcjpwYXNz"),
    );

    let response = app.send(req).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Invalid authorization header format"
    );
}
