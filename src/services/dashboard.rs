// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard loading: profile, top lists and audio features.
//!
//! [`fetch_dashboard`] is the async pipeline. [`DashboardLoader`] wraps it
//! in the idle → loading → ready/error state machine driven by a
//! [`Session`], and drops results that arrive after the credential changed.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::{Artist, AudioFeatures, TimeRange, Track, UserProfile};
use crate::services::spotify::{SpotifyClient, DEFAULT_TOP_LIMIT};
use crate::session::Session;

/// Everything the dashboard shows for one user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Dashboard {
    pub profile: UserProfile,
    pub time_range: TimeRange,
    pub top_tracks: Vec<Track>,
    pub top_artists: Vec<Artist>,
    /// Empty when the audio-features call failed
    pub audio_features: Vec<AudioFeatures>,
}

/// Load a user's dashboard data.
///
/// The profile is fetched first, then tracks and artists concurrently.
/// Audio features are best-effort: any failure yields an empty list.
pub async fn fetch_dashboard(
    client: &SpotifyClient,
    access_token: &str,
    time_range: TimeRange,
    limit: u32,
) -> Result<Dashboard, AppError> {
    let profile = client.get_profile(access_token).await?;

    let (top_tracks, top_artists) = tokio::try_join!(
        client.get_top_tracks(access_token, time_range, limit),
        client.get_top_artists(access_token, time_range, limit),
    )?;

    if top_tracks.is_empty() {
        return Err(AppError::NoListeningData(AppError::NO_RECENT_TRACKS));
    }
    if top_artists.is_empty() {
        return Err(AppError::NoListeningData(AppError::NO_RECENT_ARTISTS));
    }

    let track_ids: Vec<&str> = top_tracks.iter().map(|t| t.id.as_str()).collect();
    let audio_features = match client.get_audio_features(access_token, &track_ids).await {
        Ok(features) => features,
        Err(e) => {
            tracing::warn!(error = %e, "Audio features unavailable, continuing without them");
            Vec::new()
        }
    };

    tracing::debug!(
        user_id = %profile.id,
        tracks = top_tracks.len(),
        artists = top_artists.len(),
        features = audio_features.len(),
        "Dashboard loaded"
    );

    Ok(Dashboard {
        profile,
        time_range,
        top_tracks,
        top_artists,
        audio_features,
    })
}

/// Loader state.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// No credential
    Idle,
    /// Requests in flight
    Loading,
    Ready(Box<Dashboard>),
    /// User-facing message
    Error(String),
}

/// A started load, tied to the session generation it was started for.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    access_token: String,
}

impl LoadTicket {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Runs [`fetch_dashboard`] once per credential change.
pub struct DashboardLoader {
    client: SpotifyClient,
    time_range: TimeRange,
    limit: u32,
    state: LoadState,
    /// Generation of the last load started
    started: Option<u64>,
}

impl DashboardLoader {
    pub fn new(client: SpotifyClient) -> Self {
        Self {
            client,
            time_range: TimeRange::default(),
            limit: DEFAULT_TOP_LIMIT,
            state: LoadState::Idle,
            started: None,
        }
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Bring the state in line with the session, fetching if needed.
    pub async fn sync(&mut self, session: &mut Session) -> &LoadState {
        if let Some(ticket) = self.begin(session) {
            let result = fetch_dashboard(
                &self.client,
                ticket.access_token(),
                self.time_range,
                self.limit,
            )
            .await;
            self.finish(session, ticket, result);
        }
        &self.state
    }

    /// Start a load if the credential changed since the last one.
    ///
    /// Without a credential the loader goes idle, except that an error
    /// (e.g. "session expired") stays visible until the next login.
    pub fn begin(&mut self, session: &Session) -> Option<LoadTicket> {
        let Some(token) = session.token() else {
            if !matches!(self.state, LoadState::Error(_)) {
                self.state = LoadState::Idle;
            }
            self.started = None;
            return None;
        };

        let generation = session.generation();
        if self.started == Some(generation) {
            return None;
        }

        self.started = Some(generation);
        self.state = LoadState::Loading;
        Some(LoadTicket {
            generation,
            access_token: token.to_string(),
        })
    }

    /// Apply the result of a load started with `begin`.
    ///
    /// Results for a superseded credential are discarded.
    pub fn finish(
        &mut self,
        session: &mut Session,
        ticket: LoadTicket,
        result: Result<Dashboard, AppError>,
    ) {
        if session.generation() != ticket.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = session.generation(),
                "Discarding result of superseded dashboard load"
            );
            return;
        }

        self.state = match result {
            Ok(dashboard) => LoadState::Ready(Box::new(dashboard)),
            Err(e) => {
                if e.is_session_expired() {
                    session.expire();
                    self.started = None;
                }
                tracing::warn!(error = %e, "Dashboard load failed");
                LoadState::Error(e.user_message())
            }
        };
    }

    /// Refetch for the current credential on the next `sync`.
    ///
    /// The session is left alone; only a loaded or failed state is
    /// retried, so a load in flight is not started twice.
    pub fn retry(&mut self) {
        if matches!(self.state, LoadState::Ready(_) | LoadState::Error(_)) {
            self.started = None;
        }
    }

    /// Forget everything (explicit logout).
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
        self.started = None;
    }
}
