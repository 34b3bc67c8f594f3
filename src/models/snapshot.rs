//! Share snapshot: one user's top lists, carried inside a share link.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Artist, Image, Track};

/// Current share snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Older links wrote `null` for absent names and lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Spotify's fixed affinity windows for `/me/top/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// ~4 weeks
    ShortTerm,
    /// ~6 months
    #[default]
    MediumTerm,
    /// ~1 year
    LongTerm,
}

impl TimeRange {
    /// Query value for the `time_range` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

/// Window a snapshot was taken over.
///
/// Older links carry an explicit `{after, before}` millisecond window
/// instead of a named range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(untagged)]
pub enum SnapshotRange {
    Named(TimeRange),
    Window {
        #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
        after: i64,
        #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
        before: i64,
    },
}

impl Default for SnapshotRange {
    fn default() -> Self {
        SnapshotRange::Named(TimeRange::default())
    }
}

/// A user's listening snapshot as embedded in a share link.
///
/// The receiver trusts it at face value apart from the schema checks
/// below; nothing is re-fetched from Spotify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_has_listening_data"))]
pub struct ShareSnapshot {
    /// Schema version; links without one are version 1
    #[serde(default = "default_version")]
    pub v: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "missing user id"))]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "missing display name"))]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_artists: Vec<Artist>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_tracks: Vec<Track>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_range: SnapshotRange,
    /// RFC3339 creation time
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

fn validate_has_listening_data(snapshot: &ShareSnapshot) -> Result<(), ValidationError> {
    if snapshot.top_artists.is_empty() && snapshot.top_tracks.is_empty() {
        return Err(ValidationError::new("no_listening_data"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_window_range_deserializes() {
        let json = r#"{
            "userId": "u1",
            "displayName": "One",
            "topArtists": [{"id": "a", "name": "A", "genres": ["rock"]}],
            "timeRange": {"after": 1704067200000, "before": 1735689600000},
            "timestamp": "2025-01-01T00:00:00.000Z"
        }"#;

        let snapshot: ShareSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.v, SNAPSHOT_VERSION);
        assert_eq!(
            snapshot.time_range,
            SnapshotRange::Window {
                after: 1704067200000,
                before: 1735689600000
            }
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_snapshot_without_lists_fails_validation() {
        let snapshot = ShareSnapshot {
            v: SNAPSHOT_VERSION,
            user_id: "u1".to_string(),
            display_name: "One".to_string(),
            images: vec![],
            top_artists: vec![],
            top_tracks: vec![],
            time_range: SnapshotRange::default(),
            timestamp: String::new(),
        };

        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let json = r#"{
            "userId": "u1",
            "displayName": null,
            "images": null,
            "topArtists": null,
            "topTracks": [{"id": "t", "name": "T"}],
            "timeRange": null,
            "timestamp": null
        }"#;

        let snapshot: ShareSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.display_name, "");
        assert!(snapshot.images.is_empty());
        assert!(snapshot.top_artists.is_empty());
        assert_eq!(snapshot.top_tracks.len(), 1);
        assert_eq!(snapshot.time_range, SnapshotRange::default());
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_named_range_serializes_as_string() {
        let value = serde_json::to_value(SnapshotRange::Named(TimeRange::LongTerm)).unwrap();
        assert_eq!(value, serde_json::json!("long_term"));
    }
}
