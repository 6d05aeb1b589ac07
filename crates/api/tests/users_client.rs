//! The remote preference client and the fail-closed eligibility checker,
//! against a mock preference service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{NaiveTime, TimeZone, Utc};
use prefgate_api::config::UsersClientConfig;
use prefgate_api::notifications::{
    ClientError, EligibilityChecker, PreferenceSource, SendGate, UsersServiceClient,
};
use prefgate_core::channels::Channel;
use prefgate_core::preferences::PreferenceSnapshot;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout: Duration) -> UsersServiceClient {
    UsersServiceClient::new(&UsersClientConfig {
        base_url: format!("{}/api/v1/", server.uri()),
        timeout,
    })
    .unwrap()
}

/// The owner's response body: the snapshot plus derived flags.
fn envelope_for(snapshot: &PreferenceSnapshot) -> serde_json::Value {
    let mut data = serde_json::to_value(snapshot).unwrap();
    data["inQuietHours"] = json!(false);
    data["canReceiveEmail"] = json!(true);
    json!({ "success": true, "data": data, "timestamp": Utc::now() })
}

async fn mount(server: &MockServer, user_id: i64, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/preferences/user/{user_id}")))
        .respond_with(response)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_decodes_snapshot_and_ignores_derived_flags() {
    let server = MockServer::start().await;
    let snapshot = common::snapshot(1);
    mount(&server, 1, ResponseTemplate::new(200).set_body_json(envelope_for(&snapshot))).await;

    let fetched = client_for(&server, Duration::from_secs(2)).fetch(1).await.unwrap();
    assert!(fetched.same_content(&snapshot));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        2,
        ResponseTemplate::new(404).set_body_json(json!({ "success": false, "message": "nope" })),
    )
    .await;

    let err = client_for(&server, Duration::from_secs(2)).fetch(2).await.unwrap_err();
    assert_matches!(err, ClientError::Status { status: 404 });
}

#[tokio::test]
async fn unsuccessful_envelope_is_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(json!({ "success": false, "message": "degraded" })),
    )
    .await;

    let err = client_for(&server, Duration::from_secs(2)).fetch(3).await.unwrap_err();
    assert_matches!(err, ClientError::Unsuccessful(Some(ref m)) if m == "degraded");
}

#[tokio::test]
async fn missing_payload_is_an_error() {
    let server = MockServer::start().await;
    mount(&server, 4, ResponseTemplate::new(200).set_body_json(json!({ "success": true }))).await;

    let err = client_for(&server, Duration::from_secs(2)).fetch(4).await.unwrap_err();
    assert_matches!(err, ClientError::MissingPayload);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    mount(
        &server,
        5,
        ResponseTemplate::new(200)
            .set_body_json(envelope_for(&common::snapshot(5)))
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let err = client_for(&server, Duration::from_millis(100)).fetch(5).await.unwrap_err();
    assert_matches!(err, ClientError::Transport(_));
}

// ---------------------------------------------------------------------------
// Eligibility checker
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checker_allows_enabled_channel() {
    let server = MockServer::start().await;
    mount(&server, 1, ResponseTemplate::new(200).set_body_json(envelope_for(&common::snapshot(1)))).await;
    let checker = EligibilityChecker::new(Arc::new(client_for(&server, Duration::from_secs(2))));

    assert!(checker.can_send(1, "email").await);
    assert!(!checker.can_send(1, "SMS").await);
    assert!(!checker.can_send(1, "FAX").await);
}

#[tokio::test]
async fn checker_fails_closed_on_any_error() {
    let server = MockServer::start().await;
    mount(&server, 1, ResponseTemplate::new(500)).await;
    let checker = EligibilityChecker::new(Arc::new(client_for(&server, Duration::from_secs(2))));

    assert!(!checker.can_send(1, "EMAIL").await);
    // No mock for user 2: wiremock answers 404.
    assert!(!checker.can_send(2, "EMAIL").await);
}

#[tokio::test]
async fn checker_fails_closed_when_service_is_down() {
    let client = UsersServiceClient::new(&UsersClientConfig {
        base_url: "http://127.0.0.1:1/api/v1".to_string(),
        timeout: Duration::from_millis(200),
    })
    .unwrap();
    let checker = EligibilityChecker::new(Arc::new(client));

    assert!(!checker.can_send(1, "EMAIL").await);
}

#[tokio::test]
async fn checker_applies_quiet_hours_in_user_time_zone() {
    let mut snapshot = common::snapshot(1);
    snapshot.fields.quiet_hours_start = NaiveTime::from_hms_opt(22, 0, 0);
    snapshot.fields.quiet_hours_end = NaiveTime::from_hms_opt(6, 0, 0);
    snapshot.fields.timezone = "+02:00".to_string();
    snapshot.fields.channel_enabled.insert(Channel::Push, true);
    let checker = EligibilityChecker::new(Arc::new(common::StaticSource::Found(snapshot)));

    // 21:30 UTC is 23:30 at +02:00.
    let late = Utc.with_ymd_and_hms(2026, 3, 1, 21, 30, 0).unwrap();
    // 08:00 UTC is 10:00 at +02:00.
    let morning = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();

    assert!(!checker.can_send_at(1, "PUSH", late).await);
    assert!(checker.can_send_at(1, "PUSH", morning).await);
}

#[tokio::test]
async fn checker_denies_when_source_fails() {
    let checker = EligibilityChecker::new(Arc::new(common::StaticSource::Unreachable));
    assert!(!checker.can_send(1, "EMAIL").await);
}

#[tokio::test]
async fn checker_evaluates_non_ascii_time_zone_without_panicking() {
    let mut snapshot = common::snapshot(1);
    snapshot.fields.timezone = "日本".to_string();
    let checker = EligibilityChecker::new(Arc::new(common::StaticSource::Found(snapshot)));

    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    assert!(checker.can_send_at(1, "EMAIL", now).await);
    assert!(!checker.can_send_at(1, "SMS", now).await);
}
