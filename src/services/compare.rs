// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Taste comparison between two users.
//!
//! The compatibility score is the overlap of top artist and top track ids,
//! normalized by the larger set, averaged over whichever of the two
//! dimensions both users have data for.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Artist, Image, ShareSnapshot, Track};

/// Bars shown in the genre comparison chart.
const GENRE_BAR_LIMIT: usize = 10;
/// Axes on the genre radar.
const GENRE_RADAR_LIMIT: usize = 8;

/// `|A ∩ B| / max(|A|, |B|)` as a percentage. `None` if either set is empty.
pub fn similarity(a: &HashSet<&str>, b: &HashSet<&str>) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let common = a.intersection(b).count();
    Some(common as f64 / a.len().max(b.len()) as f64 * 100.0)
}

fn artist_ids(artists: &[Artist]) -> HashSet<&str> {
    artists.iter().map(|a| a.id.as_str()).collect()
}

fn track_ids(tracks: &[Track]) -> HashSet<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

/// Compatibility in percent, rounded.
///
/// Artists and tracks are weighted equally. A dimension only counts when
/// both users have data for it; with neither there isn't enough data and
/// the result is `None`.
pub fn compatibility_score(
    my_artists: &[Artist],
    their_artists: &[Artist],
    my_tracks: &[Track],
    their_tracks: &[Track],
) -> Option<u8> {
    let scores: Vec<f64> = [
        similarity(&artist_ids(my_artists), &artist_ids(their_artists)),
        similarity(&track_ids(my_tracks), &track_ids(their_tracks)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if scores.is_empty() {
        return None;
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(mean.round().clamp(0.0, 100.0) as u8)
}

/// One bar of the genre comparison chart (artist counts).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenreBar {
    pub genre: String,
    pub mine: u32,
    pub theirs: u32,
    pub total: u32,
}

/// One radar axis, both values scaled to the largest count (0..=100).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenreRadarPoint {
    pub genre: String,
    pub mine: f64,
    pub theirs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenreComparison {
    pub bars: Vec<GenreBar>,
    pub radar: Vec<GenreRadarPoint>,
}

/// Number of artists per genre.
pub fn genre_counts(artists: &[Artist]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for genre in artists.iter().flat_map(|a| a.genres.iter()) {
        *counts.entry(genre.as_str()).or_insert(0) += 1;
    }
    counts
}

fn count(counts: &HashMap<&str, u32>, genre: &str) -> u32 {
    counts.get(genre).copied().unwrap_or(0)
}

/// Genres in first-seen order: mine first, then theirs.
fn ordered_genres<'a>(mine: &'a [Artist], theirs: &'a [Artist]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    mine.iter()
        .chain(theirs.iter())
        .flat_map(|a| a.genres.iter())
        .map(String::as_str)
        .filter(|g| seen.insert(*g))
        .collect()
}

/// Per-genre artist counts for both users.
///
/// Ties keep first-seen order.
pub fn genre_comparison(mine: &[Artist], theirs: &[Artist]) -> GenreComparison {
    let my_counts = genre_counts(mine);
    let their_counts = genre_counts(theirs);
    let genres = ordered_genres(mine, theirs);

    let mut bars: Vec<GenreBar> = genres
        .iter()
        .map(|&genre| {
            let mine = count(&my_counts, genre);
            let theirs = count(&their_counts, genre);
            GenreBar {
                genre: genre.to_string(),
                mine,
                theirs,
                total: mine + theirs,
            }
        })
        .collect();
    bars.sort_by(|a, b| b.total.cmp(&a.total));
    bars.truncate(GENRE_BAR_LIMIT);

    let max = my_counts
        .values()
        .chain(their_counts.values())
        .copied()
        .max()
        .unwrap_or(0);

    let mut radar: Vec<GenreRadarPoint> = if max == 0 {
        Vec::new()
    } else {
        genres
            .iter()
            .map(|&genre| GenreRadarPoint {
                genre: genre.to_string(),
                mine: count(&my_counts, genre) as f64 / max as f64 * 100.0,
                theirs: count(&their_counts, genre) as f64 / max as f64 * 100.0,
            })
            .collect()
    };
    radar.sort_by(|a, b| (b.mine + b.theirs).total_cmp(&(a.mine + a.theirs)));
    radar.truncate(GENRE_RADAR_LIMIT);

    GenreComparison { bars, radar }
}

/// Total duration of the given tracks in whole minutes (rounded).
pub fn listening_minutes(tracks: &[Track]) -> u64 {
    ms_to_minutes(total_ms(tracks))
}

fn total_ms(tracks: &[Track]) -> u64 {
    tracks.iter().map(|t| t.duration_ms).sum()
}

fn ms_to_minutes(ms: u64) -> u64 {
    (ms as f64 / 60_000.0).round() as u64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ListeningTimeComparison {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub mine: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub theirs: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total: u64,
}

impl ListeningTimeComparison {
    /// Minutes per side, plus the combined total rounded once from the
    /// summed durations (not the sum of the rounded sides).
    pub fn between(my_tracks: &[Track], their_tracks: &[Track]) -> Self {
        let mine_ms = total_ms(my_tracks);
        let theirs_ms = total_ms(their_tracks);
        Self {
            mine: ms_to_minutes(mine_ms),
            theirs: ms_to_minutes(theirs_ms),
            total: ms_to_minutes(mine_ms + theirs_ms),
        }
    }
}

/// The other side of a comparison, as read from their snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ComparedUser {
    pub id: String,
    pub display_name: String,
    pub images: Vec<Image>,
}

/// Full comparison result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comparison {
    pub other_user: ComparedUser,
    /// `None` means not enough data
    pub compatibility_score: Option<u8>,
    pub genres: GenreComparison,
    pub listening_time: ListeningTimeComparison,
}

/// Compare my top lists with a decoded snapshot.
pub fn compare_with_snapshot(
    my_artists: &[Artist],
    my_tracks: &[Track],
    other: &ShareSnapshot,
) -> Comparison {
    Comparison {
        other_user: ComparedUser {
            id: other.user_id.clone(),
            display_name: other.display_name.clone(),
            images: other.images.clone(),
        },
        compatibility_score: compatibility_score(
            my_artists,
            &other.top_artists,
            my_tracks,
            &other.top_tracks,
        ),
        genres: genre_comparison(my_artists, &other.top_artists),
        listening_time: ListeningTimeComparison::between(my_tracks, &other.top_tracks),
    }
}

/// Pull a Spotify user id out of a profile URI or URL.
///
/// Accepts `spotify:user:<id>` and `https://open.spotify.com/user/<id>[?...]`.
pub fn extract_user_id(input: &str) -> Option<String> {
    const URI_PREFIX: &str = "spotify:user:";
    const URL_MARKER: &str = "open.spotify.com/user/";

    let input = input.trim();

    if let Some(pos) = input.find(URI_PREFIX) {
        let id = input[pos + URI_PREFIX.len()..].split(':').next()?;
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    if let Some(pos) = input.find(URL_MARKER) {
        let id = input[pos + URL_MARKER.len()..].split('?').next()?;
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    None
}
