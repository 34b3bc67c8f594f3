//! Spotify user profile model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Image reference as returned by Spotify (avatars, album art).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Follower count wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

/// A Spotify user profile (`/me` or `/users/{id}`).
///
/// Externally owned by Spotify and never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Spotify user ID
    pub id: String,
    /// Display name (users may not have set one)
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar images, largest first
    #[serde(default)]
    pub images: Vec<Image>,
    /// Only present for `/me` with `user-read-private`
    #[serde(default)]
    pub country: Option<String>,
    /// Subscription level ("premium", "free")
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub followers: Option<Followers>,
}

impl UserProfile {
    /// Display name, falling back to the user ID.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    /// URL of the first avatar image.
    pub fn avatar_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}
