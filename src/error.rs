// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No code provided")]
    MissingCode,

    #[error("Authorization denied by Spotify: {0}")]
    OAuthDenied(String),

    #[error("Failed to get tokens: {0}")]
    TokenExchange(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Spotify session expired")]
    SessionExpired,

    #[error("Permission denied: {endpoint}")]
    PermissionDenied { endpoint: String },

    #[error("No listening data: {0}")]
    NoListeningData(&'static str),

    #[error("Spotify API error: {0}")]
    Fetch(String),

    #[error("Invalid shareable link: {0}")]
    InvalidShareLink(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const SESSION_EXPIRED_MESSAGE: &'static str = "Session expired. Please log in again.";
    pub const FETCH_FAILED_MESSAGE: &'static str =
        "Error fetching your Spotify data. Please try again later.";
    pub const NO_RECENT_TRACKS: &'static str =
        "No recent listening data found. Try listening to some songs and come back!";
    pub const NO_RECENT_ARTISTS: &'static str =
        "No recent artist data found. Try listening to some songs and come back!";

    /// True for a 401 from Spotify: the stored credential must be dropped.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired)
    }

    /// Plain-text message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingCode => "No code provided".to_string(),
            AppError::OAuthDenied(_) => {
                "Spotify login was cancelled or denied. Please try again.".to_string()
            }
            AppError::TokenExchange(_) => "Failed to get tokens".to_string(),
            AppError::Unauthorized => "Please log in with Spotify.".to_string(),
            AppError::SessionExpired => Self::SESSION_EXPIRED_MESSAGE.to_string(),
            AppError::PermissionDenied { endpoint } => format!(
                "Permission denied: {}. Please make sure you've granted all necessary permissions.",
                endpoint
            ),
            AppError::NoListeningData(msg) => msg.to_string(),
            AppError::Fetch(_) | AppError::NotFound(_) | AppError::Internal(_) => {
                Self::FETCH_FAILED_MESSAGE.to_string()
            }
            AppError::InvalidShareLink(msg) => msg.clone(),
            AppError::UserNotFound(_) => {
                "User not found. Please check the profile link and try again.".to_string()
            }
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::MissingCode => (
                StatusCode::BAD_REQUEST,
                "missing_code",
                Some(self.user_message()),
            ),
            AppError::OAuthDenied(reason) => {
                tracing::warn!(reason = %reason, "OAuth error from Spotify");
                (StatusCode::BAD_REQUEST, "oauth_denied", Some(reason.clone()))
            }
            AppError::TokenExchange(msg) => {
                tracing::error!(error = %msg, "Token exchange failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "token_exchange_failed",
                    Some(msg.clone()),
                )
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                "session_expired",
                Some(self.user_message()),
            ),
            AppError::PermissionDenied { .. } => (
                StatusCode::FORBIDDEN,
                "permission_denied",
                Some(self.user_message()),
            ),
            AppError::NoListeningData(msg) => {
                (StatusCode::NOT_FOUND, "no_listening_data", Some(msg.to_string()))
            }
            AppError::Fetch(msg) => {
                tracing::warn!(error = %msg, "Spotify API request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "spotify_error",
                    Some(self.user_message()),
                )
            }
            AppError::InvalidShareLink(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_share_link",
                Some(msg.clone()),
            ),
            AppError::UserNotFound(_) => (
                StatusCode::NOT_FOUND,
                "user_not_found",
                Some(self.user_message()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
