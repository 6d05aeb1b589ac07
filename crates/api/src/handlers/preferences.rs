//! Handlers for `/api/v1/preferences`.
//!
//! Every snapshot leaves as a [`PreferenceView`]: the stored record plus
//! eligibility flags evaluated at response time.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use prefgate_core::eligibility::{local_time, Eligibility};
use prefgate_core::preferences::{NewPreferences, PreferencePatch, PreferenceSnapshot};
use prefgate_core::types::{DbId, UserId};
use prefgate_db::models::preferences::PreferenceFilter;
use serde::Serialize;

use crate::error::AppResult;
use crate::response;
use crate::state::PreferencesState;

/// A snapshot with its derived flags.
#[derive(Debug, Serialize)]
pub struct PreferenceView {
    #[serde(flatten)]
    pub snapshot: PreferenceSnapshot,
    #[serde(flatten)]
    pub eligibility: Eligibility,
}

impl From<PreferenceSnapshot> for PreferenceView {
    fn from(snapshot: PreferenceSnapshot) -> Self {
        let now = local_time(&snapshot.fields.timezone, Utc::now());
        let eligibility = Eligibility::evaluate(&snapshot, now);
        Self {
            snapshot,
            eligibility,
        }
    }
}

fn views(snapshots: Vec<PreferenceSnapshot>) -> Vec<PreferenceView> {
    snapshots.into_iter().map(PreferenceView::from).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsResponse {
    pub user_id: UserId,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// Single-record endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/preferences
pub async fn create_preferences(
    State(state): State<PreferencesState>,
    Json(input): Json<NewPreferences>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.service.create(input).await?;
    Ok(response::created(
        "Preferences created successfully",
        PreferenceView::from(snapshot),
    ))
}

/// GET /api/v1/preferences/user/{user_id}
pub async fn get_by_user(
    State(state): State<PreferencesState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.service.get(user_id).await?;
    Ok(response::ok(PreferenceView::from(snapshot)))
}

/// GET /api/v1/preferences/{id}
pub async fn get_by_id(
    State(state): State<PreferencesState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.service.get_by_id(id).await?;
    Ok(response::ok(PreferenceView::from(snapshot)))
}

/// PUT /api/v1/preferences/user/{user_id}
///
/// Partial update: omitted fields are left as they are.
pub async fn update_preferences(
    State(state): State<PreferencesState>,
    Path(user_id): Path<UserId>,
    Json(patch): Json<PreferencePatch>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.service.update(user_id, patch).await?;
    Ok(response::ok_with_message(
        "Preferences updated successfully",
        PreferenceView::from(snapshot),
    ))
}

/// DELETE /api/v1/preferences/user/{user_id}
pub async fn delete_preferences(
    State(state): State<PreferencesState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    state.service.delete(user_id).await?;
    Ok(response::message("Preferences deleted successfully"))
}

/// GET /api/v1/preferences/user/{user_id}/exists
pub async fn exists(
    State(state): State<PreferencesState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let exists = state.service.exists(user_id).await?;
    Ok(response::ok(ExistsResponse { user_id, exists }))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/preferences
pub async fn list_all(State(state): State<PreferencesState>) -> AppResult<impl IntoResponse> {
    let snapshots = state.service.list_all().await?;
    Ok(response::ok(views(snapshots)))
}

/// GET /api/v1/preferences/email-enabled
pub async fn list_email_enabled(
    State(state): State<PreferencesState>,
) -> AppResult<impl IntoResponse> {
    let snapshots = state
        .service
        .list_filtered(PreferenceFilter::EmailEnabled)
        .await?;
    Ok(response::ok(views(snapshots)))
}

/// GET /api/v1/preferences/push-enabled
pub async fn list_push_enabled(
    State(state): State<PreferencesState>,
) -> AppResult<impl IntoResponse> {
    let snapshots = state
        .service
        .list_filtered(PreferenceFilter::PushEnabled)
        .await?;
    Ok(response::ok(views(snapshots)))
}

/// GET /api/v1/preferences/marketing-enabled
pub async fn list_marketing_enabled(
    State(state): State<PreferencesState>,
) -> AppResult<impl IntoResponse> {
    let snapshots = state
        .service
        .list_filtered(PreferenceFilter::MarketingEnabled)
        .await?;
    Ok(response::ok(views(snapshots)))
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

/// DELETE /api/v1/preferences/cache
///
/// Evicts every cached snapshot. Safe to repeat.
pub async fn clear_cache(State(state): State<PreferencesState>) -> AppResult<impl IntoResponse> {
    let removed = state.service.clear_cache().await;
    Ok(response::ok_with_message(
        "Preference cache cleared",
        CacheClearResponse { removed },
    ))
}
