// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Web API client for listening statistics.
//!
//! Handles:
//! - Profile and public user lookup
//! - Top tracks / top artists for a time range
//! - Audio features for a batch of tracks
//! - Recently played history, following `next` cursors
//! - Mapping 401/403/404 to session, permission and not-found errors

use crate::error::AppError;
use crate::models::{
    Artist, AudioFeatures, AudioFeaturesResponse, CursorPaging, Paging, PlayHistory, TimeRange,
    Track, UserProfile,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Default number of items requested from the top endpoints.
pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Largest page `/me/player/recently-played` serves.
pub const RECENTLY_PLAYED_PAGE_SIZE: u32 = 50;

/// Stop following `next` once this many plays are collected.
pub const MAX_RECENT_PLAYS: usize = 1000;

/// Spotify Web API client. Stateless: every call takes the bearer token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    /// Create a client against `base_url` (normally `https://api.spotify.com/v1`).
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the current user's profile.
    pub async fn get_profile(&self, access_token: &str) -> Result<UserProfile, AppError> {
        let url = format!("{}/me", self.base_url);
        self.get_json(&url, access_token, &[]).await
    }

    /// Get the current user's top tracks.
    pub async fn get_top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, AppError> {
        let url = format!("{}/me/top/tracks", self.base_url);
        let page: Paging<Track> = self
            .get_json(&url, access_token, &top_query(time_range, limit))
            .await?;
        Ok(page.items)
    }

    /// Get the current user's top artists.
    pub async fn get_top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, AppError> {
        let url = format!("{}/me/top/artists", self.base_url);
        let page: Paging<Artist> = self
            .get_json(&url, access_token, &top_query(time_range, limit))
            .await?;
        Ok(page.items)
    }

    /// Get audio features for a batch of tracks. `null` entries are dropped.
    pub async fn get_audio_features(
        &self,
        access_token: &str,
        track_ids: &[&str],
    ) -> Result<Vec<AudioFeatures>, AppError> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/audio-features", self.base_url);
        let response: AudioFeaturesResponse = self
            .get_json(&url, access_token, &[("ids", track_ids.join(","))])
            .await?;

        Ok(response.audio_features.into_iter().flatten().collect())
    }

    /// Get plays since `after`, newest first, capped at [`MAX_RECENT_PLAYS`].
    pub async fn get_recently_played(
        &self,
        access_token: &str,
        after: DateTime<Utc>,
    ) -> Result<Vec<PlayHistory>, AppError> {
        let url = format!("{}/me/player/recently-played", self.base_url);
        let query = [
            ("limit", RECENTLY_PLAYED_PAGE_SIZE.to_string()),
            ("after", after.timestamp_millis().to_string()),
        ];
        let mut page: CursorPaging<PlayHistory> =
            self.get_json(&url, access_token, &query).await?;

        let mut plays = Vec::new();
        let mut pages = 1;
        loop {
            let fetched = page.items.len();
            plays.extend(page.items);
            if fetched == 0 || plays.len() >= MAX_RECENT_PLAYS {
                break;
            }
            let Some(next) = page.next else {
                break;
            };
            // The token only ever goes to the API host
            if !next.starts_with(&self.base_url) {
                return Err(AppError::Fetch(format!("Unexpected next page URL: {}", next)));
            }
            page = self.get_json(&next, access_token, &[]).await?;
            pages += 1;
        }
        plays.truncate(MAX_RECENT_PLAYS);

        tracing::debug!(plays = plays.len(), pages, "Recently played history loaded");
        Ok(plays)
    }

    /// Look up another user's public profile.
    pub async fn get_user(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<UserProfile, AppError> {
        let url = format!(
            "{}/users/{}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        match self.get_json(&url, access_token, &[]).await {
            Err(AppError::NotFound(_)) => Err(AppError::UserNotFound(user_id.to_string())),
            other => other,
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let endpoint = response.url().to_string();
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => {
                    tracing::info!(endpoint = %endpoint, "Spotify rejected access token (401)");
                    AppError::SessionExpired
                }
                403 => {
                    tracing::warn!(endpoint = %endpoint, "Spotify denied access (403)");
                    AppError::PermissionDenied { endpoint }
                }
                404 => AppError::NotFound(endpoint),
                _ => AppError::Fetch(format!("HTTP {} from {}: {}", status, endpoint, body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("JSON parse error: {}", e)))
    }
}

fn top_query(time_range: TimeRange, limit: u32) -> [(&'static str, String); 2] {
    [
        ("limit", limit.to_string()),
        ("time_range", time_range.as_str().to_string()),
    ]
}
