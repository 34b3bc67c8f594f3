// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Recently played history.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::Track;

/// One play from `/me/player/recently-played`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    pub played_at: DateTime<Utc>,
}

/// Cursor-paged list. `next` is an absolute URL, absent on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct CursorPaging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}
