// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes backed by the caller's Spotify access token.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::BearerToken;
use crate::models::{TimeRange, UserProfile};
use crate::services::activity::{fetch_activity, ListeningActivity};
use crate::services::compare::{compare_with_snapshot, extract_user_id, Comparison};
use crate::services::dashboard::{fetch_dashboard, Dashboard};
use crate::services::insights::{self, Insights};
use crate::services::share::{build_snapshot, decode_share_link, encode_share_link};
use crate::services::spotify::DEFAULT_TOP_LIMIT;
use crate::AppState;

const INVALID_PROFILE_LINK: &str =
    "Invalid Spotify link. Please use a profile link like https://open.spotify.com/user/<id>";

/// API routes (require a bearer token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/activity", get(get_activity))
        .route("/api/share", post(create_share_link))
        .route("/api/compare", post(compare))
        .route("/api/users/lookup", get(lookup_user))
}

#[derive(Debug, Default, Deserialize)]
pub struct TimeRangeParams {
    #[serde(default)]
    time_range: TimeRange,
}

// ─── Dashboard ───────────────────────────────────────────────

/// Dashboard data plus derived insights.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub insights: Insights,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Json<DashboardResponse>> {
    let dashboard = fetch_dashboard(
        &state.spotify,
        token.as_str(),
        params.time_range,
        DEFAULT_TOP_LIMIT,
    )
    .await?;

    let insights = insights::compute(
        &dashboard.top_tracks,
        &dashboard.top_artists,
        &dashboard.audio_features,
        Utc::now().date_naive(),
    );

    Ok(Json(DashboardResponse {
        dashboard,
        insights,
    }))
}

// ─── Activity ────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    /// Minutes east of UTC used for day and hour buckets
    #[serde(default)]
    utc_offset_minutes: i32,
}

/// Year-to-date listening time, heatmap and hour/weekday counts.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
    Query(params): Query<ActivityParams>,
) -> Result<Json<ListeningActivity>> {
    let offset = params
        .utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid UTC offset: {} minutes",
                params.utc_offset_minutes
            ))
        })?;

    let activity = fetch_activity(&state.spotify, token.as_str(), Utc::now(), offset).await?;

    tracing::debug!(
        plays = activity.plays,
        minutes = activity.minutes_listened,
        "Activity computed"
    );

    Ok(Json(activity))
}

// ─── Share Links ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ShareResponse {
    pub link: String,
}

/// Snapshot the caller's top lists into a share link.
async fn create_share_link(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Json<ShareResponse>> {
    let profile = state.spotify.get_profile(token.as_str()).await?;
    let (top_artists, top_tracks) = tokio::try_join!(
        state
            .spotify
            .get_top_artists(token.as_str(), params.time_range, DEFAULT_TOP_LIMIT),
        state
            .spotify
            .get_top_tracks(token.as_str(), params.time_range, DEFAULT_TOP_LIMIT),
    )?;

    let snapshot = build_snapshot(
        &profile,
        top_artists,
        top_tracks,
        params.time_range,
        Utc::now(),
    );
    let link = encode_share_link(
        &state.config.share_base_url,
        &snapshot,
        state.config.share_signing_key.as_deref(),
    )?;

    tracing::info!(
        user_id = %profile.id,
        artists = snapshot.top_artists.len(),
        tracks = snapshot.top_tracks.len(),
        "Share link created"
    );

    Ok(Json(ShareResponse { link }))
}

// ─── Comparison ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    #[validate(length(min = 1, message = "Please paste a shareable link"))]
    link: String,
}

/// Compare the caller's top lists against a share link.
async fn compare(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Comparison>> {
    request
        .validate()
        .map_err(|_| AppError::InvalidShareLink("Please paste a shareable link".to_string()))?;

    // Reject bad links before spending any Spotify calls
    let other = decode_share_link(&request.link, state.config.share_signing_key.as_deref())?;

    let (my_artists, my_tracks) = tokio::try_join!(
        state
            .spotify
            .get_top_artists(token.as_str(), TimeRange::default(), DEFAULT_TOP_LIMIT),
        state
            .spotify
            .get_top_tracks(token.as_str(), TimeRange::default(), DEFAULT_TOP_LIMIT),
    )?;

    let comparison = compare_with_snapshot(&my_artists, &my_tracks, &other);

    tracing::info!(
        other_user = %other.user_id,
        score = ?comparison.compatibility_score,
        "Comparison computed"
    );

    Ok(Json(comparison))
}

// ─── User Lookup ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    query: String,
}

/// Look up a public profile from a `spotify:user:` URI or profile URL.
async fn lookup_user(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
    Query(params): Query<LookupParams>,
) -> Result<Json<UserProfile>> {
    let user_id = extract_user_id(&params.query)
        .ok_or_else(|| AppError::BadRequest(INVALID_PROFILE_LINK.to_string()))?;

    let profile = state.spotify.get_user(token.as_str(), &user_id).await?;
    Ok(Json(profile))
}
