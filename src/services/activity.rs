// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Listening activity for the current year, built from recently played
//! history: minutes listened, a per-day heatmap and hour/weekday counts.
//!
//! Spotify only keeps a short play history, so these numbers cover what
//! the API still returns (at most [`MAX_RECENT_PLAYS`] plays).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::PlayHistory;
use crate::services::spotify::{SpotifyClient, MAX_RECENT_PLAYS};

/// Heatmap minutes credited per play, whatever the track length.
pub const MINUTES_PER_PLAY: u32 = 3;

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DayActivity {
    /// YYYY-MM-DD in the caller's offset
    pub date: String,
    pub minutes: u32,
    /// 0..=4, see [`intensity_level`]
    pub level: u8,
}

/// Year-to-date listening summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ListeningActivity {
    pub year: i32,
    pub plays: u32,
    /// Sum of track durations, rounded to the minute
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub minutes_listened: u64,
    /// Days with at least one play, oldest first
    pub daily: Vec<DayActivity>,
    pub max_daily_minutes: u32,
    /// Plays per hour of day, index 0 = midnight
    pub hourly_plays: Vec<u32>,
    /// Plays per weekday, index 0 = Sunday
    pub weekday_plays: Vec<u32>,
}

/// Midnight on January 1st of `year` at `offset`, as UTC.
pub fn start_of_year(year: i32, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|d| d.with_timezone(&Utc))
}

/// Heatmap shade for a day's minutes.
pub fn intensity_level(minutes: u32) -> u8 {
    match minutes {
        0 => 0,
        1..=30 => 1,
        31..=60 => 2,
        61..=90 => 3,
        _ => 4,
    }
}

/// Aggregate plays, bucketing days and hours at `offset`.
pub fn summarize(year: i32, plays: &[PlayHistory], offset: FixedOffset) -> ListeningActivity {
    let total_ms: u64 = plays.iter().map(|p| p.track.duration_ms).sum();

    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut hourly_plays = vec![0u32; 24];
    let mut weekday_plays = vec![0u32; 7];

    for play in plays {
        let local = play.played_at.with_timezone(&offset);
        *per_day.entry(local.date_naive()).or_default() += MINUTES_PER_PLAY;
        hourly_plays[local.hour() as usize] += 1;
        weekday_plays[local.weekday().num_days_from_sunday() as usize] += 1;
    }

    let daily: Vec<DayActivity> = per_day
        .into_iter()
        .map(|(date, minutes)| DayActivity {
            date: date.to_string(),
            minutes,
            level: intensity_level(minutes),
        })
        .collect();

    ListeningActivity {
        year,
        plays: plays.len() as u32,
        minutes_listened: (total_ms as f64 / 60_000.0).round() as u64,
        max_daily_minutes: daily.iter().map(|d| d.minutes).max().unwrap_or(0),
        daily,
        hourly_plays,
        weekday_plays,
    }
}

/// Fetch this year's plays and summarize them.
pub async fn fetch_activity(
    client: &SpotifyClient,
    access_token: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<ListeningActivity, AppError> {
    let year = now.with_timezone(&offset).year();
    let after = start_of_year(year, offset)
        .ok_or_else(|| AppError::BadRequest(format!("No start of year for {}", year)))?;

    let plays = client.get_recently_played(access_token, after).await?;
    if plays.len() >= MAX_RECENT_PLAYS {
        tracing::info!(plays = plays.len(), "Play history truncated");
    }

    Ok(summarize(year, &plays, offset))
}
