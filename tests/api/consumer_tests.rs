//! Consumer API Tests
//!
//! Medication, log and note-analysis requests rejected before persistence.

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use health_tracker::domain::UserRole;

use crate::common::{body_json, json_request, TestApp};

#[tokio::test]
async fn test_create_medication_requires_name() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .post_json_auth("/api/medications", &json!({ "name": "", "dosage": "5mg" }), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "name");
}

#[tokio::test]
async fn test_update_medication_rejects_blank_dosage() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .send(json_request(
            Method::PUT,
            "/api/medications/5f0c9a3e-8a53-4c8e-9a1b-1d2e3f4a5b6c",
            Some(&token),
            &json!({ "dosage": "" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_log_requires_medication_id() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .post_json_auth("/api/medication-logs", &json!({ "notes": "after lunch" }), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 10002);
}

#[tokio::test]
async fn test_calendar_rejects_inverted_range() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .get_auth(
            "/api/medication-logs/calendar?from=2024-03-01T00:00:00Z&to=2024-02-01T00:00:00Z",
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_rejects_inverted_range() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .get_auth(
            "/api/medication-logs/export?from=2024-03-01T00:00:00Z&to=2024-02-01T00:00:00Z",
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_blank_note_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    let response = app
        .post_json_auth("/api/ai/analyze-note", &json!({ "note": "   " }), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["field"], "note");
}

#[tokio::test]
async fn test_analyze_note_too_long_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);
    let note = "a".repeat(4001);

    let response = app
        .post_json_auth("/api/ai/analyze-note", &json!({ "note": note }), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Without a provider key the analysis endpoints are unavailable
#[tokio::test]
async fn test_analyze_note_without_api_key_is_unavailable() {
    let app = TestApp::new().await;
    let token = app.token_for(UserRole::User);

    for uri in ["/api/ai/analyze-note", "/api/ai/analyze-and-save"] {
        let response = app
            .post_json_auth(uri, &json!({ "note": "took 200mg ibuprofen at 8am" }), &token)
            .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body_json(response).await["code"], 10009);
    }
}
