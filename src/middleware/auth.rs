// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token extraction for the Spotify-backed API routes.
//!
//! The server never stores the user's token. Each request carries it in
//! `Authorization: Bearer <token>` and it is forwarded to Spotify as-is.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::fmt;

use crate::error::AppError;

/// Spotify access token taken from the request.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Pull a non-empty bearer token out of the `Authorization` header.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<BearerToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| BearerToken(token.to_string()))
}

/// Middleware that requires a bearer token.
pub async fn require_bearer(mut request: Request, next: Next) -> Result<Response, AppError> {
    let token = bearer_from_headers(request.headers()).ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}
