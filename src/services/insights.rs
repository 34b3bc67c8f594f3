// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived listening statistics: genre diversity, audio-feature averages,
//! mood and personality labels, and the "fun facts" shown on the dashboard.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Artist, AudioFeatures, Track};
use crate::time_utils::parse_release_date;

/// Number of fun facts picked for a given day.
const FUN_FACT_COUNT: usize = 3;

/// Genre diversity level by unique genre count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum GenreLevel {
    Explorer,
    Enthusiast,
    Expert,
    Master,
}

impl GenreLevel {
    pub fn from_count(unique_genres: usize) -> Self {
        match unique_genres {
            n if n > 20 => GenreLevel::Master,
            n if n > 15 => GenreLevel::Expert,
            n if n > 10 => GenreLevel::Enthusiast,
            _ => GenreLevel::Explorer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenreLevel::Explorer => "Explorer",
            GenreLevel::Enthusiast => "Enthusiast",
            GenreLevel::Expert => "Expert",
            GenreLevel::Master => "Master",
        }
    }
}

/// Mean audio features over the top tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeatureAverages {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub speechiness: f64,
    pub liveness: f64,
}

impl FeatureAverages {
    /// `None` for an empty feature list.
    pub fn from_features(features: &[AudioFeatures]) -> Option<Self> {
        if features.is_empty() {
            return None;
        }
        let n = features.len() as f64;
        let mean = |f: fn(&AudioFeatures) -> f64| features.iter().map(f).sum::<f64>() / n;

        Some(Self {
            danceability: mean(|a| a.danceability),
            energy: mean(|a| a.energy),
            valence: mean(|a| a.valence),
            tempo: mean(|a| a.tempo),
            acousticness: mean(|a| a.acousticness),
            instrumentalness: mean(|a| a.instrumentalness),
            speechiness: mean(|a| a.speechiness),
            liveness: mean(|a| a.liveness),
        })
    }

    pub fn mood_tags(&self) -> Vec<MoodTag> {
        let mut tags = Vec::new();
        if self.valence > 0.6 {
            tags.push(MoodTag::Upbeat);
        }
        if self.valence < 0.4 {
            tags.push(MoodTag::Moody);
        }
        if self.danceability > 0.6 {
            tags.push(MoodTag::Dancey);
        }
        if self.energy < 0.4 {
            tags.push(MoodTag::Chill);
        }
        tags
    }

    pub fn personality(&self) -> Personality {
        if self.energy > 0.8 && self.tempo > 120.0 {
            Personality::Headbanger
        } else if self.energy > 0.7 && self.danceability > 0.7 {
            Personality::Bopper
        } else if self.instrumentalness > 0.5 {
            Personality::Explorer
        } else if self.valence > 0.7 && self.energy < 0.5 {
            Personality::Romantic
        } else {
            Personality::Eclectic
        }
    }

    pub fn tempo_class(&self) -> TempoClass {
        let bpm = self.tempo.round();
        if bpm > 120.0 {
            TempoClass::Upbeat
        } else if bpm > 100.0 {
            TempoClass::Moderate
        } else {
            TempoClass::Chill
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MoodTag {
    Upbeat,
    Moody,
    Dancey,
    Chill,
}

impl MoodTag {
    fn as_str(&self) -> &'static str {
        match self {
            MoodTag::Upbeat => "upbeat",
            MoodTag::Moody => "moody",
            MoodTag::Dancey => "dancey",
            MoodTag::Chill => "chill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Personality {
    Headbanger,
    Bopper,
    Explorer,
    Romantic,
    Eclectic,
}

impl Personality {
    fn label(&self) -> &'static str {
        match self {
            Personality::Headbanger => "The Headbanger",
            Personality::Bopper => "The Bopper",
            Personality::Explorer => "The Explorer",
            Personality::Romantic => "The Romantic",
            Personality::Eclectic => "The Eclectic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TempoClass {
    Upbeat,
    Moderate,
    Chill,
}

/// A track picked out for a fact, with its release year when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrackHighlight {
    pub id: String,
    pub name: String,
    pub popularity: u32,
    pub release_year: Option<i32>,
}

impl TrackHighlight {
    fn from_track(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            popularity: track.popularity,
            release_year: release_date(track).map(|d| d.year()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FunFact {
    pub title: String,
    pub description: String,
}

/// Everything derived from one user's dashboard data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Insights {
    pub unique_genres: Vec<String>,
    pub genre_level: GenreLevel,
    pub features: Option<FeatureAverages>,
    pub mood_tags: Vec<MoodTag>,
    pub personality: Option<Personality>,
    pub tempo_class: Option<TempoClass>,
    pub most_popular_track: Option<TrackHighlight>,
    pub top_artist: Option<String>,
    pub oldest_track: Option<TrackHighlight>,
    pub newest_track: Option<TrackHighlight>,
    /// Day-seeded selection of facts
    pub fun_facts: Vec<FunFact>,
}

fn release_date(track: &Track) -> Option<NaiveDate> {
    track
        .album
        .as_ref()
        .and_then(|album| album.release_date.as_deref())
        .and_then(parse_release_date)
}

/// Unique genres across artists, in first-seen order.
pub fn unique_genres(artists: &[Artist]) -> Vec<String> {
    let mut seen = HashSet::new();
    artists
        .iter()
        .flat_map(|a| a.genres.iter())
        .filter(|g| seen.insert(g.as_str()))
        .cloned()
        .collect()
}

/// Compute insights for `today` (which seeds the fun-fact selection).
pub fn compute(
    tracks: &[Track],
    artists: &[Artist],
    features: &[AudioFeatures],
    today: NaiveDate,
) -> Insights {
    let genres = unique_genres(artists);
    let averages = FeatureAverages::from_features(features);

    // First maximum wins on ties
    let most_popular_track = tracks
        .iter()
        .fold(None::<&Track>, |best, t| match best {
            Some(b) if b.popularity >= t.popularity => Some(b),
            _ => Some(t),
        })
        .map(TrackHighlight::from_track);

    let dated: Vec<(&Track, NaiveDate)> = tracks
        .iter()
        .filter_map(|t| release_date(t).map(|d| (t, d)))
        .collect();
    let oldest_track = dated
        .iter()
        .fold(None::<&(&Track, NaiveDate)>, |best, item| match best {
            Some(b) if b.1 <= item.1 => Some(b),
            _ => Some(item),
        })
        .map(|(t, _)| TrackHighlight::from_track(t));
    let newest_track = dated
        .iter()
        .fold(None::<&(&Track, NaiveDate)>, |best, item| match best {
            Some(b) if b.1 >= item.1 => Some(b),
            _ => Some(item),
        })
        .map(|(t, _)| TrackHighlight::from_track(t));

    let mut insights = Insights {
        genre_level: GenreLevel::from_count(genres.len()),
        unique_genres: genres,
        mood_tags: averages.as_ref().map(|a| a.mood_tags()).unwrap_or_default(),
        personality: averages.as_ref().map(|a| a.personality()),
        tempo_class: averages.as_ref().map(|a| a.tempo_class()),
        features: averages,
        most_popular_track,
        top_artist: artists.first().map(|a| a.name.clone()),
        oldest_track,
        newest_track,
        fun_facts: Vec::new(),
    };

    let facts = all_fun_facts(&insights, !artists.is_empty(), today.year());
    insights.fun_facts = pick_for_day(facts, today);
    insights
}

fn all_fun_facts(insights: &Insights, has_artists: bool, year: i32) -> Vec<FunFact> {
    let mut facts = Vec::new();
    let mut push = |title: String, description: String| {
        facts.push(FunFact { title, description })
    };

    if let Some(track) = &insights.most_popular_track {
        push(
            format!("Your Most Popular Track of {}", year),
            format!(
                "'{}' was your highest-rated track this year with a popularity score of {}/100!",
                track.name, track.popularity
            ),
        );
    }

    if let Some(artist) = &insights.top_artist {
        push(
            format!("Your #1 Artist of {}", year),
            format!("{} was your most-listened artist this year!", artist),
        );
    }

    if has_artists {
        push(
            format!("Genre Explorer of {}", year),
            format!(
                "You're a {} with {} unique genres in your rotation!",
                insights.genre_level.label(),
                insights.unique_genres.len()
            ),
        );
    }

    if let Some((track, year_released)) = insights
        .oldest_track
        .as_ref()
        .and_then(|t| t.release_year.map(|y| (t, y)))
    {
        push(
            format!("Throwback of {}", year),
            format!(
                "'{}' ({}) was the oldest track in your top songs!",
                track.name, year_released
            ),
        );
    }

    if let Some((track, year_released)) = insights
        .newest_track
        .as_ref()
        .and_then(|t| t.release_year.map(|y| (t, y)))
    {
        push(
            format!("Fresh Pick of {}", year),
            format!(
                "'{}' ({}) was the newest track in your top songs!",
                track.name, year_released
            ),
        );
    }

    if let Some(averages) = &insights.features {
        let mood = if insights.mood_tags.is_empty() {
            "balanced".to_string()
        } else {
            insights
                .mood_tags
                .iter()
                .map(MoodTag::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        push(
            format!("Your Musical Vibe of {}", year),
            format!("Based on your top tracks, your music taste is {}!", mood),
        );

        push(
            format!("Musical Personality of {}", year),
            format!(
                "Based on your top tracks' features, you're {}!",
                averages.personality().label()
            ),
        );

        let tempo = match averages.tempo_class() {
            TempoClass::Upbeat => "upbeat",
            TempoClass::Moderate => "moderate",
            TempoClass::Chill => "chill",
        };
        push(
            format!("Your Musical Beat of {}", year),
            format!(
                "Your top tracks average {} BPM, that's a {} groove!",
                averages.tempo.round(),
                tempo
            ),
        );
    }

    facts
}

/// Deterministic pseudo-random value in `[0, 1)` for a seed.
fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

/// Pick up to [`FUN_FACT_COUNT`] facts, stable for a given day.
fn pick_for_day(mut facts: Vec<FunFact>, today: NaiveDate) -> Vec<FunFact> {
    let seed = today.year() as f64 * 10000.0 + today.month() as f64 * 100.0 + today.day() as f64;

    let mut picked = Vec::with_capacity(FUN_FACT_COUNT);
    for i in 0..FUN_FACT_COUNT {
        if facts.is_empty() {
            break;
        }
        let r = seeded_random(seed + 9.0 + i as f64);
        let index = ((r * facts.len() as f64).floor() as usize).min(facts.len() - 1);
        picked.push(facts.remove(index));
    }
    picked
}
