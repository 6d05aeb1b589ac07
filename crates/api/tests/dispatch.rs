//! Notification dispatch: gating, sender invocation and delivery records.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use prefgate_api::error::AppError;
use prefgate_api::notifications::{Dispatcher, SenderRegistry};
use prefgate_core::error::CoreError;
use serde_json::json;

use common::{
    body_json, build_notifications_app, dispatcher, get, post_json, CountingSender, FixedGate,
    MemoryRecordStore, STORE_TIMEOUT,
};

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn denied_send_writes_nothing_and_calls_no_sender() {
    let sender = Arc::new(CountingSender::default());
    let records = MemoryRecordStore::new();
    let d = dispatcher(Arc::new(FixedGate(false)), sender.clone(), records.clone());

    let err = d.send_notification(1, "EMAIL", "hello").await.unwrap_err();

    assert_matches!(err, AppError::Core(CoreError::NotPermitted(_)));
    assert_eq!(sender.calls(), 0);
    assert!(records.all().is_empty());
}

#[tokio::test]
async fn allowed_send_calls_sender_once_and_records() {
    let sender = Arc::new(CountingSender::default());
    let records = MemoryRecordStore::new();
    let d = dispatcher(Arc::new(FixedGate(true)), sender.clone(), records.clone());

    let record = d.send_notification(1, "push", "hello").await.unwrap();

    assert_eq!(sender.calls(), 1);
    assert_eq!(record.channel, "PUSH");
    assert_eq!(record.message, "hello");
    assert_eq!(records.all(), vec![record]);
}

#[tokio::test]
async fn unknown_channel_is_recorded_without_a_sender() {
    let sender = Arc::new(CountingSender::default());
    let records = MemoryRecordStore::new();
    let d = dispatcher(Arc::new(FixedGate(true)), sender.clone(), records.clone());

    let record = d.send_notification(1, "fax", "hello").await.unwrap();

    assert_eq!(sender.calls(), 0);
    assert_eq!(record.channel, "fax");
    assert_eq!(records.all().len(), 1);
}

#[tokio::test]
async fn transport_failure_returns_internal_error_and_writes_nothing() {
    let records = MemoryRecordStore::new();
    let d = Dispatcher::new(
        Arc::new(FixedGate(true)),
        SenderRegistry::new(),
        records.clone(),
        STORE_TIMEOUT,
    );

    let err = d.send_notification(1, "EMAIL", "hello").await.unwrap_err();

    assert_matches!(err, AppError::InternalError(_));
    assert!(records.all().is_empty());
}

#[tokio::test]
async fn record_ids_are_unique() {
    let records = MemoryRecordStore::new();
    let d = dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        records.clone(),
    );

    let a = d.send_notification(1, "EMAIL", "one").await.unwrap();
    let b = d.send_notification(1, "EMAIL", "two").await.unwrap();
    assert_ne!(a.id, b.id);
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_send_returns_201_with_record() {
    let records = MemoryRecordStore::new();
    let app = build_notifications_app(dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        records.clone(),
    ));

    let response = post_json(
        app,
        "/api/v1/notifications/send",
        json!({ "userId": 9, "channel": "SMS", "message": "code 1234" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["userId"], 9);
    assert_eq!(body["data"]["channel"], "SMS");
    assert!(body["data"]["sentAt"].is_string());
    assert_eq!(records.all().len(), 1);
}

#[tokio::test]
async fn test_send_blocked_returns_403() {
    let records = MemoryRecordStore::new();
    let app = build_notifications_app(dispatcher(
        Arc::new(FixedGate(false)),
        Arc::new(CountingSender::default()),
        records.clone(),
    ));

    let response = post_json(
        app,
        "/api/v1/notifications/send",
        json!({ "userId": 9, "channel": "EMAIL", "message": "hi" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_PERMITTED");
    assert!(records.all().is_empty());
}

#[tokio::test]
async fn test_send_with_blank_fields_returns_400() {
    let app = build_notifications_app(dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        MemoryRecordStore::new(),
    ));

    let response = post_json(
        app,
        "/api/v1/notifications/send",
        json!({ "userId": 9, "channel": " ", "message": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_can_send_query() {
    let app = build_notifications_app(dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        MemoryRecordStore::new(),
    ));

    let response = get(app, "/api/v1/notifications/can-send?userId=4&channel=email").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["userId"], 4);
    assert_eq!(body["data"]["channel"], "email");
    assert_eq!(body["data"]["canSend"], true);
}

#[tokio::test]
async fn test_malformed_queries_return_400_envelope() {
    let app = build_notifications_app(dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        MemoryRecordStore::new(),
    ));

    let response = get(app.clone(), "/api/v1/notifications/can-send?userId=4").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["path"], "/api/v1/notifications/can-send");

    let response = get(app, "/api/v1/notifications/user/3?limit=many").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_record_lookups() {
    let records = MemoryRecordStore::new();
    let d = dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        records.clone(),
    );
    let record = d.send_notification(3, "EMAIL", "hello").await.unwrap();
    let app = build_notifications_app(d);

    let listed = body_json(get(app.clone(), "/api/v1/notifications/user/3?limit=10").await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let found = get(app.clone(), &format!("/api/v1/notifications/{}", record.id)).await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(body_json(found).await["data"]["message"], "hello");

    let missing_path = format!("/api/v1/notifications/{}", uuid::Uuid::nil());
    let missing = get(app, &missing_path).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["path"], missing_path);
}

#[tokio::test]
async fn test_status_and_health() {
    let app = build_notifications_app(dispatcher(
        Arc::new(FixedGate(true)),
        Arc::new(CountingSender::default()),
        MemoryRecordStore::new(),
    ));

    let status = body_json(get(app.clone(), "/api/v1/notifications").await).await;
    assert_eq!(status["message"], "Notification service is running");

    let health = body_json(get(app, "/health").await).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["dbHealthy"], true);
}
