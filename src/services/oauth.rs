// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify authorization code flow.
//!
//! Handles:
//! - Building the authorize URL the browser is sent to
//! - Exchanging the returned code for an access token

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

/// Permission scopes requested at login.
pub const SCOPES: &[&str] = &[
    "user-top-read",
    "user-read-recently-played",
    "user-read-playback-position",
    "user-library-read",
    "user-read-private",
    "user-read-email",
    "user-read-playback-state",
    "user-read-currently-playing",
];

/// Build the Spotify authorize URL.
///
/// `show_dialog` forces the consent screen even if the user already
/// approved the app, which lets them switch accounts.
pub fn authorize_url(config: &Config, show_dialog: bool) -> String {
    let mut url = format!(
        "{}/authorize?\
         response_type=code&\
         client_id={}&\
         scope={}&\
         redirect_uri={}",
        config.accounts_base_url.trim_end_matches('/'),
        urlencoding::encode(&config.spotify_client_id),
        urlencoding::encode(&SCOPES.join(" ")),
        urlencoding::encode(&config.redirect_uri),
    );
    if show_dialog {
        url.push_str("&show_dialog=true");
    }
    url
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Confidential client for the accounts service token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: format!(
                "{}/api/token",
                config.accounts_base_url.trim_end_matches('/')
            ),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// `Authorization` header value: `Basic base64(client_id:client_secret)`.
    pub fn basic_credential(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(pair.as_bytes()))
    }

    /// Exchange an authorization code for an access token. Not retried.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .header(header::AUTHORIZATION, self.basic_credential())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Spotify token exchange failed");
            return Err(AppError::TokenExchange(format!(
                "Token exchange failed with status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("Failed to parse token response: {}", e)))
    }
}
