//! Middleware Tests
//!
//! Security headers, CORS, rate limiting and metrics on the assembled router.

use axum::{
    body::Body,
    http::{header, Method, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{body_bytes, body_json, json_request, request, TestApp};

#[tokio::test]
async fn test_security_headers_on_success() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    let headers = response.headers();

    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_some());
    assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
}

#[tokio::test]
async fn test_security_headers_on_errors() {
    let app = TestApp::with_settings(|s| s.security.enable_hsts = true).await;

    let response = app.get("/api/auth/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert!(response
        .headers()
        .get(header::STRICT_TRANSPORT_SECURITY)
        .is_some());
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let app = TestApp::new().await;
    let mut preflight = request(Method::OPTIONS, "/api/medications", None, Body::empty());
    let headers = preflight.headers_mut();
    headers.insert(header::ORIGIN, "http://localhost:3000".parse().unwrap());
    headers.insert(header::ACCESS_CONTROL_REQUEST_METHOD, "POST".parse().unwrap());
    headers.insert(
        header::ACCESS_CONTROL_REQUEST_HEADERS,
        "authorization,content-type".parse().unwrap(),
    );

    let response = app.send(preflight).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let app = TestApp::new().await;
    let mut req = request(Method::GET, "/health", None, Body::empty());
    req.headers_mut()
        .insert(header::ORIGIN, "https://evil.example".parse().unwrap());

    let response = app.send(req).await;

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

fn login_attempt(ip: &str) -> axum::http::Request<Body> {
    let mut req = json_request(
        Method::POST,
        "/api/auth/login",
        None,
        &json!({ "email": "not-an-email", "password": "x" }),
    );
    req.headers_mut()
        .insert("x-forwarded-for", ip.parse().unwrap());
    req
}

#[tokio::test]
async fn test_auth_rate_limit_per_client() {
    let app = TestApp::with_settings(|s| s.rate_limit.auth_requests_per_window = 2).await;

    for _ in 0..2 {
        let response = app.send(login_attempt("203.0.113.7")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let limited = app.send(login_attempt("203.0.113.7")).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers().get(header::RETRY_AFTER).is_some());
    let json = body_json(limited).await;
    assert_eq!(json["code"], 10006);
    assert_eq!(json["rate_limit"]["remaining"], 0);

    // Another client has its own window
    let other = app.send(login_attempt("198.51.100.20")).await;
    assert_eq!(other.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_limit_does_not_apply_to_auth_routes() {
    let app = TestApp::with_settings(|s| s.rate_limit.api_requests_per_window = 1).await;

    for _ in 0..3 {
        let response = app.send(login_attempt("203.0.113.8")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_metrics_endpoint_exports_http_requests() {
    let app = TestApp::new().await;
    app.get("/health/live").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("health_tracker_http_requests_total"));
    assert!(body.contains("path=\"/health/live\""));
}
