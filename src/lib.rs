// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Spotify Wrapped: listening statistics and taste comparison for Spotify users
//!
//! This crate provides the backend that exchanges Spotify authorization
//! codes for access tokens, loads a user's top tracks and artists, and
//! compares two users' listening profiles through share links.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use services::{OAuthClient, SpotifyClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub oauth: OAuthClient,
    pub spotify: SpotifyClient,
}

impl AppState {
    /// Build the shared state (HTTP clients) from configuration.
    pub fn new(config: Config) -> Self {
        let oauth = OAuthClient::new(&config);
        let spotify = SpotifyClient::new(config.api_base_url.clone());
        Self {
            config,
            oauth,
            spotify,
        }
    }
}
