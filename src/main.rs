// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify Wrapped API Server
//!
//! Proxies the Spotify authorization code exchange and serves listening
//! statistics and taste comparisons to the front end.

use spotify_wrapped::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Missing client credentials must stop startup
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        frontend_url = %config.frontend_url,
        share_signing = config.share_signing_key.is_some(),
        "Starting Spotify Wrapped API"
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config));

    let app = spotify_wrapped::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spotify_wrapped=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
