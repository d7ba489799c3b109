//! Route Guard Tests
//!
//! Admin routes demand the admin role, consumer routes any valid token, and
//! catalogue reads stay public.

use axum::{
    body::Body,
    http::{Method, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use health_tracker::domain::UserRole;

use crate::common::{body_json, json_request, request, TestApp};

#[test_case(Method::GET, "/api/users" ; "list users")]
#[test_case(Method::POST, "/api/users" ; "create user")]
#[test_case(Method::POST, "/api/categories" ; "create category")]
#[test_case(Method::DELETE, "/api/tags/5f0c9a3e-8a53-4c8e-9a1b-1d2e3f4a5b6c" ; "delete tag")]
#[test_case(Method::GET, "/api/blog-posts/statistics" ; "post statistics")]
#[test_case(Method::PATCH, "/api/blog-posts/5f0c9a3e-8a53-4c8e-9a1b-1d2e3f4a5b6c/publish" ; "publish post")]
#[tokio::test]
async fn test_admin_routes_forbid_regular_users(method: Method, uri: &str) {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .send(json_request(method, uri, Some(&token), &json!({})))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], 10004);
    assert_eq!(json["message"], "Admin access required");
}

#[test_case(Method::GET, "/api/users")]
#[test_case(Method::PATCH, "/api/categories/5f0c9a3e-8a53-4c8e-9a1b-1d2e3f4a5b6c")]
#[test_case(Method::POST, "/api/blog-posts")]
#[tokio::test]
async fn test_admin_routes_require_token(method: Method, uri: &str) {
    let app = TestApp::new().await;

    let response = app.send(request(method, uri, None, Body::empty())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test_case("/api/medications")]
#[test_case("/api/medication-logs")]
#[test_case("/api/medication-logs/export")]
#[test_case("/api/medication-logs/calendar")]
#[tokio::test]
async fn test_consumer_routes_require_token(uri: &str) {
    let app = TestApp::new().await;

    let response = app.get(uri).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_analyze_note_requires_token() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/ai/analyze-note", &json!({ "note": "took 200mg ibuprofen" }))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Admin writes pass the guard and reach request validation
#[tokio::test]
async fn test_admin_token_passes_guard() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::Admin);

    let response = app
        .post_json_auth("/api/categories", &json!({ "name": "", "slug": "Bad Slug" }), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"slug"));
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::Admin);

    let response = app.get_auth("/api/users/not-a-uuid", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
