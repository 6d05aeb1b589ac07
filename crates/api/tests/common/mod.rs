//! Shared fixtures for the API integration tests.
//!
//! The store, record store and preference source are in-memory fakes, so
//! these tests run without PostgreSQL, Redis or a second service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use prefgate_api::app;
use prefgate_api::config::ServerConfig;
use prefgate_api::notifications::{
    ChannelSender, ClientError, DeliveryRecordStore, Dispatcher, PreferenceSource, SendError,
    SendGate, SenderRegistry,
};
use prefgate_api::preferences::{PreferenceService, PreferenceStore};
use prefgate_api::state::{NotificationsState, PreferencesState};
use prefgate_cache::{CacheBackend, CacheNamespace, NamespaceCache};
use prefgate_core::channels::Channel;
use prefgate_core::preferences::{PreferenceFields, PreferenceSnapshot};
use prefgate_core::types::{DbId, UserId};
use prefgate_db::models::delivery::{DeliveryRecord, NewDeliveryRecord};
use prefgate_db::models::preferences::PreferenceFilter;
use tower::ServiceExt;
use uuid::Uuid;

pub const STORE_TIMEOUT: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

// ---------------------------------------------------------------------------
// In-memory preference store
// ---------------------------------------------------------------------------

/// Preference store that counts reads and can be told to stall.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    rows: Mutex<HashMap<UserId, PreferenceSnapshot>>,
    next_id: AtomicI64,
    reads: AtomicUsize,
    stalled: AtomicBool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of `find_by_user_id` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Make every later call hang past [`STORE_TIMEOUT`].
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    /// Write directly, bypassing the service and its cache.
    pub fn put_raw(&self, snapshot: PreferenceSnapshot) {
        self.rows.lock().unwrap().insert(snapshot.user_id, snapshot);
    }

    async fn maybe_stall(&self) {
        if self.stalled.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
    }

    fn sorted(&self, keep: impl Fn(&PreferenceSnapshot) -> bool) -> Vec<PreferenceSnapshot> {
        let mut out: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| keep(s))
            .cloned()
            .collect();
        out.sort_by_key(|s| s.user_id);
        out
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<PreferenceSnapshot>, sqlx::Error> {
        self.maybe_stall().await;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<PreferenceSnapshot>, sqlx::Error> {
        self.maybe_stall().await;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn exists(&self, user_id: UserId) -> Result<bool, sqlx::Error> {
        self.maybe_stall().await;
        Ok(self.rows.lock().unwrap().contains_key(&user_id))
    }

    async fn list_all(&self) -> Result<Vec<PreferenceSnapshot>, sqlx::Error> {
        self.maybe_stall().await;
        Ok(self.sorted(|_| true))
    }

    async fn list_by_filter(
        &self,
        filter: PreferenceFilter,
    ) -> Result<Vec<PreferenceSnapshot>, sqlx::Error> {
        self.maybe_stall().await;
        Ok(self.sorted(|s| filter.matches(&s.fields)))
    }

    async fn insert(
        &self,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<PreferenceSnapshot, sqlx::Error> {
        self.maybe_stall().await;
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&user_id) {
            return Err(sqlx::Error::Protocol("duplicate user_id".into()));
        }
        let now = Utc::now();
        let snapshot = PreferenceSnapshot {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id,
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.insert(user_id, snapshot.clone());
        Ok(snapshot)
    }

    async fn update(
        &self,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<Option<PreferenceSnapshot>, sqlx::Error> {
        self.maybe_stall().await;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(&user_id).map(|row| {
            row.fields = fields.clone();
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, user_id: UserId) -> Result<bool, sqlx::Error> {
        self.maybe_stall().await;
        Ok(self.rows.lock().unwrap().remove(&user_id).is_some())
    }

    async fn is_healthy(&self) -> bool {
        !self.stalled.load(Ordering::SeqCst)
    }
}

pub fn local_cache() -> NamespaceCache<PreferenceSnapshot> {
    NamespaceCache::new(
        CacheBackend::new_local(),
        CacheNamespace::UserPreferences,
        "test:",
        Duration::from_secs(120),
    )
}

pub fn preference_service(store: Arc<MemoryPreferenceStore>) -> PreferenceService {
    PreferenceService::new(store, local_cache(), STORE_TIMEOUT)
}

pub fn build_preferences_app(store: Arc<MemoryPreferenceStore>) -> Router {
    let state = PreferencesState {
        service: Arc::new(preference_service(store)),
    };
    app::preferences_app(state, &test_config())
}

// ---------------------------------------------------------------------------
// Notification side fakes
// ---------------------------------------------------------------------------

/// Gate with a fixed answer.
pub struct FixedGate(pub bool);

#[async_trait]
impl SendGate for FixedGate {
    async fn can_send(&self, _user_id: UserId, _channel: &str) -> bool {
        self.0
    }
}

/// Preference source returning a canned snapshot or a canned failure.
pub enum StaticSource {
    Found(PreferenceSnapshot),
    Unreachable,
}

#[async_trait]
impl PreferenceSource for StaticSource {
    async fn fetch(&self, _user_id: UserId) -> Result<PreferenceSnapshot, ClientError> {
        match self {
            StaticSource::Found(snapshot) => Ok(snapshot.clone()),
            StaticSource::Unreachable => Err(ClientError::MissingPayload),
        }
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<DeliveryRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<DeliveryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryRecordStore for MemoryRecordStore {
    async fn insert(&self, record: &NewDeliveryRecord) -> Result<DeliveryRecord, sqlx::Error> {
        let stored = DeliveryRecord {
            id: record.id,
            user_id: record.user_id,
            channel: record.channel.clone(),
            message: record.message.clone(),
            sent_at: Utc::now(),
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DeliveryRecord>, sqlx::Error> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<DeliveryRecord>, sqlx::Error> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Sender that counts calls.
#[derive(Default)]
pub struct CountingSender {
    calls: AtomicUsize,
}

impl CountingSender {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelSender for CountingSender {
    async fn send(&self, _user_id: UserId, _message: &str) -> Result<(), SendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A registry where every known channel goes to `sender`.
pub fn counting_registry(sender: Arc<CountingSender>) -> SenderRegistry {
    let mut registry = SenderRegistry::new();
    for channel in Channel::ALL {
        registry.register(channel, sender.clone());
    }
    registry
}

pub fn dispatcher(
    gate: Arc<dyn SendGate>,
    sender: Arc<CountingSender>,
    records: Arc<MemoryRecordStore>,
) -> Dispatcher {
    Dispatcher::new(gate, counting_registry(sender), records, STORE_TIMEOUT)
}

pub fn build_notifications_app(dispatcher: Dispatcher) -> Router {
    let state = NotificationsState {
        dispatcher: Arc::new(dispatcher),
    };
    app::notifications_app(state, &test_config())
}

/// A snapshot with default fields for `user_id`.
pub fn snapshot(user_id: UserId) -> PreferenceSnapshot {
    let now = Utc::now();
    PreferenceSnapshot {
        id: user_id,
        user_id,
        fields: PreferenceFields::default(),
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
