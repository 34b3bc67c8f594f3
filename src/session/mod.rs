// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client credential lifecycle.
//!
//! A [`Session`] owns the current access token and mirrors it into a
//! [`CredentialStore`]. The token arrives once in the `access_token` query
//! parameter of the post-login redirect; it is captured, persisted and
//! stripped from the URL so it doesn't linger in history or referrers.

pub mod store;

pub use store::{CredentialStore, FileStore, MemoryStore, StoreError};

use std::fmt;
use std::sync::Arc;
use url::Url;

/// Storage key for the persisted token.
pub const TOKEN_KEY: &str = "spotify_token";

/// Query parameter the callback redirect carries the token in.
pub const TOKEN_PARAM: &str = "access_token";

/// Explicit session context passed to whatever needs the credential.
pub struct Session {
    store: Arc<dyn CredentialStore>,
    token: Option<String>,
    /// Bumped on every credential change
    generation: u64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Session {
    /// Session with no credential and nothing loaded from the store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            token: None,
            generation: 0,
        }
    }

    /// Restore the session on page load.
    ///
    /// If `current_url` carries a token it wins over anything persisted: it
    /// is saved and the returned URL has the parameter removed. Otherwise
    /// the persisted token, if any, is recovered and the URL is returned
    /// unchanged.
    pub fn restore(store: Arc<dyn CredentialStore>, current_url: &Url) -> (Self, Url) {
        let mut session = Self::new(store);

        let captured = current_url
            .query_pairs()
            .find(|(key, value)| key == TOKEN_PARAM && !value.is_empty())
            .map(|(_, value)| value.into_owned());

        if let Some(token) = captured {
            tracing::debug!("Captured access token from redirect URL");
            session.set_token(token);
            return (session, strip_token(current_url));
        }

        match session.store.load(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                tracing::debug!("Recovered persisted access token");
                session.token = Some(token);
                session.generation += 1;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read persisted token"),
        }

        (session, current_url.clone())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Changes whenever the credential is set or cleared.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Install a fresh token (after login) and persist it.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.store.save(TOKEN_KEY, &token) {
            tracing::warn!(error = %e, "Failed to persist access token");
        }
        self.token = Some(token);
        self.generation += 1;
    }

    /// Explicit logout: drop the token from memory and storage.
    pub fn logout(&mut self) {
        self.clear();
    }

    /// Drop the credential after Spotify answered 401.
    ///
    /// Returns `true` if a credential was cleared; repeated calls for the
    /// same expiry are no-ops so the store is only touched once.
    pub fn expire(&mut self) -> bool {
        if self.token.is_none() {
            return false;
        }
        tracing::info!("Access token expired, clearing session");
        self.clear();
        true
    }

    fn clear(&mut self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to remove persisted token");
        }
        if self.token.take().is_some() {
            self.generation += 1;
        }
    }
}

/// Remove the token parameter, keeping every other query pair.
fn strip_token(url: &Url) -> Url {
    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TOKEN_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cleaned = url.clone();
    if remaining.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(remaining);
    }
    cleaned
}
