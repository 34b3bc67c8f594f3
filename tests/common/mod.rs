// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a local stand-in for the Spotify accounts service
//! and Web API, plus app construction against it.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use spotify_wrapped::config::Config;
use spotify_wrapped::routes::create_router;
use spotify_wrapped::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// The only token the mock Web API accepts.
#[allow(dead_code)]
pub const VALID_TOKEN: &str = "valid-access-token";

/// Token handed out by the mock token endpoint (needs URL-encoding).
#[allow(dead_code)]
pub const ISSUED_TOKEN: &str = "BQD+issued/token=";

/// Public profile the mock knows about besides the caller.
#[allow(dead_code)]
pub const KNOWN_USER: &str = "known_user";

/// Recorded traffic and configurable failures.
pub struct MockSpotify {
    pub token_calls: AtomicUsize,
    pub api_calls: AtomicUsize,
    pub token_auth_header: Mutex<Option<String>>,
    pub token_form: Mutex<HashMap<String, String>>,
    pub audio_feature_ids: Mutex<Option<String>>,
    failures: Mutex<HashMap<&'static str, u16>>,
    top_tracks: Mutex<Value>,
    top_artists: Mutex<Value>,
    recent_plays: Mutex<Vec<Value>>,
    /// Query strings seen by the recently-played endpoint
    pub recent_queries: Mutex<Vec<HashMap<String, String>>>,
}

#[allow(dead_code)]
impl MockSpotify {
    fn new() -> Self {
        Self {
            token_calls: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
            token_auth_header: Mutex::new(None),
            token_form: Mutex::new(HashMap::new()),
            audio_feature_ids: Mutex::new(None),
            failures: Mutex::new(HashMap::new()),
            top_tracks: Mutex::new(sample_tracks()),
            top_artists: Mutex::new(sample_artists()),
            recent_plays: Mutex::new(sample_plays()),
            recent_queries: Mutex::new(Vec::new()),
        }
    }

    /// Make `endpoint` ("token", "me", "top_tracks", "top_artists",
    /// "audio_features", "recently_played", "users") answer with `status`.
    pub fn fail(&self, endpoint: &'static str, status: u16) {
        self.failures.lock().unwrap().insert(endpoint, status);
    }

    /// Undo `fail` for `endpoint`.
    pub fn recover(&self, endpoint: &str) {
        self.failures.lock().unwrap().remove(endpoint);
    }

    pub fn set_top_tracks(&self, tracks: Value) {
        *self.top_tracks.lock().unwrap() = tracks;
    }

    pub fn set_top_artists(&self, artists: Value) {
        *self.top_artists.lock().unwrap() = artists;
    }

    pub fn set_recent_plays(&self, plays: Vec<Value>) {
        *self.recent_plays.lock().unwrap() = plays;
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    fn failure(&self, endpoint: &str) -> Option<Response> {
        let status = *self.failures.lock().unwrap().get(endpoint)?;
        let status = StatusCode::from_u16(status).unwrap();
        Some(
            (
                status,
                Json(json!({"error": {"status": status.as_u16(), "message": "mock failure"}})),
            )
                .into_response(),
        )
    }

    /// Count the call, then apply failures and the bearer check.
    fn check(&self, headers: &HeaderMap, endpoint: &str) -> Option<Response> {
        self.api_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(response) = self.failure(endpoint) {
            return Some(response);
        }
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let expected = format!("Bearer {}", VALID_TOKEN);
        if auth != Some(expected.as_str()) {
            return Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
                )
                    .into_response(),
            );
        }
        None
    }
}

#[allow(dead_code)]
pub fn sample_profile(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "display_name": name,
        "images": [{"url": format!("https://i.scdn.co/image/{}", id), "height": 300, "width": 300}],
        "country": "US",
        "product": "premium",
        "followers": {"total": 42},
        "type": "user"
    })
}

#[allow(dead_code)]
pub fn sample_tracks() -> Value {
    json!([
        {
            "id": "t1",
            "name": "New Noise",
            "popularity": 61,
            "duration_ms": 301000,
            "artists": [{"id": "a1", "name": "Refused"}],
            "album": {"name": "The Shape of Punk to Come", "release_date": "1998-10-27", "images": []}
        },
        {
            "id": "t2",
            "name": "Blue Monday",
            "popularity": 75,
            "duration_ms": 449000,
            "artists": [{"id": "a2", "name": "New Order"}],
            "album": {"name": "Blue Monday", "release_date": "1983", "images": []}
        },
        {
            "id": "t3",
            "name": "Everything In Its Right Place",
            "popularity": 70,
            "duration_ms": 250000,
            "artists": [{"id": "a3", "name": "Radiohead"}],
            "album": {"name": "Kid A", "release_date": "2000-10", "images": []}
        }
    ])
}

#[allow(dead_code)]
pub fn sample_artists() -> Value {
    json!([
        {"id": "a1", "name": "Refused", "popularity": 55, "genres": ["hardcore punk", "swedish punk"], "images": []},
        {"id": "a2", "name": "New Order", "popularity": 68, "genres": ["new wave", "synthpop"], "images": []},
        {"id": "a3", "name": "Radiohead", "popularity": 80, "genres": ["art rock", "alternative rock"], "images": []}
    ])
}

/// Plays of the sample tracks: Monday 2026-03-02 twice, Saturday
/// 2026-03-07 once. 1,000,000 ms in total.
#[allow(dead_code)]
pub fn sample_plays() -> Vec<Value> {
    let tracks = sample_tracks();
    [
        (0, "2026-03-07T08:05:00Z"),
        (1, "2026-03-02T21:40:00Z"),
        (2, "2026-03-02T08:15:00Z"),
    ]
    .into_iter()
    .map(|(i, played_at)| json!({"track": tracks[i], "played_at": played_at}))
    .collect()
}

async fn token(
    State(mock): State<Arc<MockSpotify>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.token_calls.fetch_add(1, Ordering::SeqCst);
    *mock.token_auth_header.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *mock.token_form.lock().unwrap() = form;

    if let Some(status) = mock.failures.lock().unwrap().get("token") {
        return (
            StatusCode::from_u16(*status).unwrap(),
            Json(json!({"error": "invalid_grant", "error_description": "Invalid authorization code"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": ISSUED_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-me",
        "scope": "user-top-read user-read-private"
    }))
    .into_response()
}

async fn me(State(mock): State<Arc<MockSpotify>>, headers: HeaderMap) -> Response {
    if let Some(response) = mock.check(&headers, "me") {
        return response;
    }
    Json(sample_profile("me_user", "Me")).into_response()
}

async fn top_tracks(State(mock): State<Arc<MockSpotify>>, headers: HeaderMap) -> Response {
    if let Some(response) = mock.check(&headers, "top_tracks") {
        return response;
    }
    let items = mock.top_tracks.lock().unwrap().clone();
    Json(json!({"items": items, "total": 3})).into_response()
}

async fn top_artists(State(mock): State<Arc<MockSpotify>>, headers: HeaderMap) -> Response {
    if let Some(response) = mock.check(&headers, "top_artists") {
        return response;
    }
    let items = mock.top_artists.lock().unwrap().clone();
    Json(json!({"items": items, "total": 3})).into_response()
}

async fn audio_features(
    State(mock): State<Arc<MockSpotify>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = mock.check(&headers, "audio_features") {
        return response;
    }
    let ids = params.get("ids").cloned().unwrap_or_default();
    *mock.audio_feature_ids.lock().unwrap() = Some(ids.clone());

    // Unknown tracks come back as null
    let mut features: Vec<Value> = ids
        .split(',')
        .filter(|id| !id.is_empty())
        .map(|id| {
            json!({
                "id": id,
                "danceability": 0.75,
                "energy": 0.75,
                "valence": 0.65,
                "tempo": 128.0,
                "acousticness": 0.05,
                "instrumentalness": 0.1,
                "speechiness": 0.04,
                "liveness": 0.12
            })
        })
        .collect();
    features.push(Value::Null);

    Json(json!({"audio_features": features})).into_response()
}

/// Serves `recent_plays` in pages of `limit`, with an absolute `next` URL.
async fn recently_played(
    State(mock): State<Arc<MockSpotify>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = mock.check(&headers, "recently_played") {
        return response;
    }
    mock.recent_queries.lock().unwrap().push(params.clone());

    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let plays = mock.recent_plays.lock().unwrap();
    let end = (offset + limit).min(plays.len());
    let items = plays.get(offset..end).unwrap_or_default().to_vec();

    let next = (end < plays.len()).then(|| {
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        format!(
            "http://{}/v1/me/player/recently-played?limit={}&offset={}",
            host, limit, end
        )
    });

    Json(json!({"items": items, "next": next, "limit": limit})).into_response()
}

async fn user(
    State(mock): State<Arc<MockSpotify>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(response) = mock.check(&headers, "users") {
        return response;
    }
    if id != KNOWN_USER {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"status": 404, "message": "Resource not found"}})),
        )
            .into_response();
    }
    Json(sample_profile(KNOWN_USER, "Known User")).into_response()
}

/// Start the mock on an ephemeral port. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_mock_spotify() -> (String, Arc<MockSpotify>) {
    let mock = Arc::new(MockSpotify::new());

    let app = Router::new()
        .route("/api/token", post(token))
        .route("/v1/me", get(me))
        .route("/v1/me/top/tracks", get(top_tracks))
        .route("/v1/me/top/artists", get(top_artists))
        .route("/v1/audio-features", get(audio_features))
        .route("/v1/me/player/recently-played", get(recently_played))
        .route("/v1/users/{id}", get(user))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

/// Test configuration pointing both Spotify services at `base`.
#[allow(dead_code)]
pub fn test_config(base: &str) -> Config {
    Config {
        accounts_base_url: base.to_string(),
        api_base_url: format!("{}/v1", base),
        ..Config::test_default()
    }
}

/// Create a test app for `config`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
