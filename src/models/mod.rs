// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for Spotify objects and share snapshots.

pub mod history;
pub mod profile;
pub mod snapshot;
pub mod track;

pub use history::{CursorPaging, PlayHistory};
pub use profile::{Followers, Image, UserProfile};
pub use snapshot::{ShareSnapshot, SnapshotRange, TimeRange};
pub use track::{Album, Artist, ArtistRef, AudioFeatures, AudioFeaturesResponse, Paging, Track};
