// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use spotify_wrapped::error::AppError;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_is_session_expired() {
    assert!(AppError::SessionExpired.is_session_expired());

    assert!(!AppError::Unauthorized.is_session_expired());
    assert!(!AppError::Fetch("HTTP 401".to_string()).is_session_expired());
    assert!(!AppError::PermissionDenied {
        endpoint: "https://api.spotify.com/v1/me".to_string()
    }
    .is_session_expired());
}

#[test]
fn test_user_messages() {
    assert_eq!(
        AppError::SessionExpired.user_message(),
        AppError::SESSION_EXPIRED_MESSAGE
    );
    assert_eq!(
        AppError::PermissionDenied {
            endpoint: "https://api.spotify.com/v1/me/top/tracks".to_string()
        }
        .user_message(),
        "Permission denied: https://api.spotify.com/v1/me/top/tracks. Please make sure you've granted all necessary permissions."
    );
    // Upstream details never reach the user
    assert_eq!(
        AppError::Fetch("HTTP 500 from https://api.spotify.com/v1/me".to_string()).user_message(),
        AppError::FETCH_FAILED_MESSAGE
    );
}

#[tokio::test]
async fn test_missing_code_response() {
    let (status, body) = render(AppError::MissingCode).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        serde_json::json!({"error": "missing_code", "details": "No code provided"})
    );
}

#[tokio::test]
async fn test_status_mapping() {
    let cases = [
        (AppError::TokenExchange("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR, "token_exchange_failed"),
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
        (AppError::SessionExpired, StatusCode::UNAUTHORIZED, "session_expired"),
        (AppError::NoListeningData(AppError::NO_RECENT_ARTISTS), StatusCode::NOT_FOUND, "no_listening_data"),
        (AppError::Fetch("x".to_string()), StatusCode::BAD_GATEWAY, "spotify_error"),
        (AppError::InvalidShareLink("x".to_string()), StatusCode::BAD_REQUEST, "invalid_share_link"),
        (AppError::UserNotFound("x".to_string()), StatusCode::NOT_FOUND, "user_not_found"),
    ];

    for (err, expected_status, expected_code) in cases {
        let (status, body) = render(err).await;
        assert_eq!(status, expected_status, "{}", expected_code);
        assert_eq!(body["error"], expected_code);
    }
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (status, body) = render(AppError::Internal(anyhow::anyhow!("db password wrong"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({"error": "internal_error"}));
}
