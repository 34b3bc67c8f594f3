// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod compare;
pub mod dashboard;
pub mod insights;
pub mod oauth;
pub mod share;
pub mod spotify;

pub use activity::{fetch_activity, ListeningActivity};
pub use compare::{compare_with_snapshot, compatibility_score, extract_user_id, Comparison};
pub use dashboard::{fetch_dashboard, Dashboard, DashboardLoader, LoadState, LoadTicket};
pub use insights::Insights;
pub use oauth::{authorize_url, OAuthClient, TokenResponse};
pub use share::{build_snapshot, decode_share_link, encode_share_link};
pub use spotify::SpotifyClient;
