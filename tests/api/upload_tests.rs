//! Blog Image Upload Tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;

use health_tracker::domain::UserRole;

use crate::common::{body_bytes, body_json, TestApp};

const BOUNDARY: &str = "health-tracker-test-boundary";

const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

fn multipart_body(field: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"image.png\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/blog-posts/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_stores_and_serves_image() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::Admin);

    let response = app
        .send(upload_request(&token, multipart_body("file", "image/png", PNG)))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["content_type"], "image/png");
    assert_eq!(json["size"], PNG.len());
    let url = json["url"].as_str().unwrap().to_owned();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let served = app.get(&url).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, PNG);
}

#[tokio::test]
async fn test_upload_rejects_mismatched_type() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::Admin);

    let response = app
        .send(upload_request(&token, multipart_body("file", "image/jpeg", PNG)))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::Admin);

    let response = app
        .send(upload_request(&token, multipart_body("image", "image/png", PNG)))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file provided");
}

#[tokio::test]
async fn test_upload_over_limit() {
    let app = TestApp::with_settings(|s| s.uploads.max_bytes = 8).await;
    let token = app.token_for(UserRole::Admin);

    let response = app
        .send(upload_request(&token, multipart_body("file", "image/png", PNG)))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .send(upload_request(&token, multipart_body("file", "image/png", PNG)))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
