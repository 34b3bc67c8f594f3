// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify OAuth routes: login redirect and token exchange callback.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::services::oauth::authorize_url;
use crate::session::TOKEN_PARAM;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/api", get(dispatch))
}

/// Query parameters for starting the login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    /// "true" forces the Spotify consent screen
    #[serde(default)]
    show_dialog: Option<String>,
}

/// Query parameters Spotify appends to the redirect URI.
#[derive(Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// `/api?path=...` carries the parameters of whichever handler it targets.
#[derive(Deserialize)]
pub struct DispatchParams {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    show_dialog: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// 302 to `location`.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Start the authorization code flow.
async fn login(State(state): State<Arc<AppState>>, Query(params): Query<LoginParams>) -> Response {
    start_login(&state, params)
}

fn start_login(state: &AppState, params: LoginParams) -> Response {
    let show_dialog = params.show_dialog.as_deref() == Some("true");
    tracing::info!(show_dialog, "Starting OAuth flow, redirecting to Spotify");
    found(authorize_url(&state.config, show_dialog))
}

/// Exchange the authorization code and hand the token to the front end.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    finish_login(&state, params).await
}

async fn finish_login(state: &AppState, params: CallbackParams) -> Result<Response> {
    if let Some(error) = params.error {
        return Err(AppError::OAuthDenied(error));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingCode)?;

    if params.state.is_some() {
        tracing::debug!("Callback carried a state parameter");
    }

    let tokens = state.oauth.exchange_code(&code).await?;

    tracing::info!(
        expires_in = ?tokens.expires_in,
        scope = ?tokens.scope,
        "Token exchange succeeded, redirecting to front end"
    );

    Ok(found(format!(
        "{}/?{}={}",
        state.config.frontend_url,
        TOKEN_PARAM,
        urlencoding::encode(&tokens.access_token)
    )))
}

/// Single entry point used by serverless deployments.
async fn dispatch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DispatchParams>,
) -> Result<Response> {
    match params.path.as_deref() {
        Some("login") => Ok(start_login(
            &state,
            LoginParams {
                show_dialog: params.show_dialog,
            },
        )),
        Some("callback") => {
            finish_login(
                &state,
                CallbackParams {
                    code: params.code,
                    error: params.error,
                    state: params.state,
                },
            )
            .await
        }
        other => Err(AppError::NotFound(format!(
            "Unknown path: {}",
            other.unwrap_or("")
        ))),
    }
}
