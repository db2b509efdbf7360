// SPDX-License-Identifier: MIT

//! Job lifecycle tests against the full router.
//!
//! Submission must return an id immediately, the job must be observable as
//! `queued` right away, and the terminal status must appear after the
//! simulated synthesis delay. Ownership is enforced on every status read.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::time::Duration;
use tower::ServiceExt;

mod common;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn submit_request(token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/tts/jobs")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn status_request(token: &str, job_id: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/api/tts/jobs/{}", job_id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_submit_then_poll_to_completion() {
    let (app, state) = common::create_test_app();
    let token = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);

    // Submit returns 202 and a job id without waiting for completion.
    let response = app
        .clone()
        .oneshot(submit_request(
            &token,
            r#"{"text": "Hello", "voiceId": "vi-VN-Standard-A"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let id = json_body(response).await["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    // Immediately observable in the queued state.
    let response = app.clone().oneshot(status_request(&token, &id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "queued");

    // Past the configured maximum delay the job is terminal.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = app.clone().oneshot(status_request(&token, &id)).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "completed");
    let url = body["url"].as_str().unwrap();
    assert!(!url.is_empty());
    assert!(body.get("error").is_none());

    // Terminal results are stable across repeated reads.
    let response = app.oneshot(status_request(&token, &id)).await.unwrap();
    let again = json_body(response).await;
    assert_eq!(again["status"], "completed");
    assert_eq!(again["url"].as_str().unwrap(), url);
}

#[tokio::test]
async fn test_submit_ids_are_unique() {
    let (app, state) = common::create_test_app();
    let token = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);

    let mut seen = std::collections::HashSet::new();
    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(submit_request(
                &token,
                r#"{"text": "Hello", "voiceId": "vi-VN-Standard-A"}"#,
            ))
            .await
            .unwrap();
        let id = json_body(response).await["id"].as_str().unwrap().to_string();
        assert!(seen.insert(id), "job ids must never repeat");
    }
}

#[tokio::test]
async fn test_submit_empty_text_is_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);

    let response = app
        .oneshot(submit_request(
            &token,
            r#"{"text": "", "voiceId": "vi-VN-Standard-A"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // No job was allocated.
    assert!(state.jobs.is_empty());
}

#[tokio::test]
async fn test_submit_unknown_voice_is_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);

    let response = app
        .oneshot(submit_request(
            &token,
            r#"{"text": "Hello", "voiceId": "en-US-Nonexistent"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.jobs.is_empty());
}

#[tokio::test]
async fn test_submit_requires_authentication() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/tts/jobs")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"text": "Hello", "voiceId": "vi-VN-Standard-A"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_enforces_ownership() {
    let (app, state) = common::create_test_app();
    let owner = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);
    let stranger = common::session_token("u2@example.com", false, &state.config.jwt_signing_key);
    let admin =
        common::session_token("admin@aivoice.studio", true, &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(submit_request(
            &owner,
            r#"{"text": "Hello", "voiceId": "vi-VN-Standard-A"}"#,
        ))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    // Non-owner, non-admin: forbidden.
    let response = app
        .clone()
        .oneshot(status_request(&stranger, &id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Owner: allowed.
    let response = app.clone().oneshot(status_request(&owner, &id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Admin: allowed.
    let response = app.oneshot(status_request(&admin, &id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_status_unknown_job_is_not_found() {
    let (app, state) = common::create_test_app();
    let token = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);

    let response = app
        .oneshot(status_request(&token, "no-such-job-id"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_reserved_text_surfaces_failure() {
    let (app, state) = common::create_test_app();
    let token = common::session_token("u1@example.com", false, &state.config.jwt_signing_key);

    let response = app
        .clone()
        .oneshot(submit_request(
            &token,
            r#"{"text": "__fail__", "voiceId": "vi-VN-Standard-A"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = app.oneshot(status_request(&token, &id)).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "failed");
    // The stored error description is surfaced, never a raw exception.
    assert_eq!(body["error"], "Speech synthesis failed");
    assert!(body.get("url").is_none());
}
