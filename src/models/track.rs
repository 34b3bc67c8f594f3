//! Track, artist and audio-feature models.
//!
//! Field names follow the Spotify Web API so the same structs can be
//! embedded in share snapshots and read back by either side.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Image;

/// Paged list wrapper used by the `/me/top/*` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// Artist as it appears inside a track (no genres or popularity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Album summary attached to a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Album {
    #[serde(default)]
    pub name: String,
    /// "YYYY", "YYYY-MM" or "YYYY-MM-DD" depending on precision
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A top track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// 0..=100
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<Album>,
}

/// A top artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Audio analysis values for a single track.
///
/// All ratios are 0.0..=1.0 except `tempo` (BPM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AudioFeatures {
    pub id: String,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub speechiness: f64,
    #[serde(default)]
    pub liveness: f64,
}

/// `/audio-features?ids=` response. Unknown ids come back as `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_ignores_unknown_fields() {
        let json = r#"{
            "id": "4iV5W9uYEdYUVa79Axb7Rh",
            "name": "New Noise",
            "popularity": 61,
            "duration_ms": 301000,
            "explicit": false,
            "artists": [{"id": "1", "name": "Refused", "type": "artist"}],
            "album": {"name": "The Shape of Punk to Come", "release_date": "1998", "release_date_precision": "year"}
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.popularity, 61);
        assert_eq!(track.artists[0].name, "Refused");
        assert_eq!(
            track.album.and_then(|a| a.release_date),
            Some("1998".to_string())
        );
    }

    #[test]
    fn test_audio_features_nulls_are_kept_as_none() {
        let json = r#"{"audio_features": [null, {"id": "a", "energy": 0.5, "tempo": 128.0}]}"#;

        let response: AudioFeaturesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.audio_features.len(), 2);
        assert!(response.audio_features[0].is_none());
        let features = response.audio_features[1].as_ref().unwrap();
        assert_eq!(features.tempo, 128.0);
        assert_eq!(features.valence, 0.0);
    }
}
