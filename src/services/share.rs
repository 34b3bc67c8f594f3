// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Share links carrying a [`ShareSnapshot`].
//!
//! Format: `{base}/compare?data=<base64url(JSON)>[&sig=<hex HMAC-SHA256>]`.
//! The JSON carries a schema version. When a signing key is configured,
//! links must carry a valid signature over the `data` value.

use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use validator::Validate;

use crate::error::AppError;
use crate::models::snapshot::SNAPSHOT_VERSION;
use crate::models::{Artist, ShareSnapshot, SnapshotRange, TimeRange, Track, UserProfile};
use crate::time_utils::format_utc_rfc3339;

type HmacSha256 = Hmac<Sha256>;

const INVALID_FORMAT: &str = "Invalid shareable link format";
const MISSING_USER_INFO: &str = "Invalid shareable link: Missing required user information";
const NO_DATA: &str = "This wrapped link contains no data to compare. Please generate a new link after listening to some music.";

/// Build a snapshot of the current user's top lists.
pub fn build_snapshot(
    profile: &UserProfile,
    top_artists: Vec<Artist>,
    top_tracks: Vec<Track>,
    time_range: TimeRange,
    now: DateTime<Utc>,
) -> ShareSnapshot {
    ShareSnapshot {
        v: SNAPSHOT_VERSION,
        user_id: profile.id.clone(),
        display_name: profile.name().to_string(),
        images: profile.images.clone(),
        top_artists,
        top_tracks,
        time_range: SnapshotRange::Named(time_range),
        timestamp: format_utc_rfc3339(now),
    }
}

/// Encode a snapshot into a share link under `base_url`.
pub fn encode_share_link(
    base_url: &str,
    snapshot: &ShareSnapshot,
    signing_key: Option<&[u8]>,
) -> Result<String, AppError> {
    let json = serde_json::to_vec(snapshot)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Snapshot serialization failed: {}", e)))?;
    let data = URL_SAFE_NO_PAD.encode(json);

    let mut link = format!("{}/compare?data={}", base_url.trim_end_matches('/'), data);
    if let Some(key) = signing_key {
        link.push_str("&sig=");
        link.push_str(&sign(key, &data)?);
    }
    Ok(link)
}

/// Decode and validate a share link.
///
/// `input` may be a full link or just its query string. Every failure is
/// reported as [`AppError::InvalidShareLink`] with a user-facing message.
pub fn decode_share_link(
    input: &str,
    signing_key: Option<&[u8]>,
) -> Result<ShareSnapshot, AppError> {
    let input = input.trim();
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };

    let mut data = None;
    let mut sig = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "data" => data = Some(value.into_owned()),
            "sig" => sig = Some(value.into_owned()),
            _ => {}
        }
    }

    let data = data
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| invalid(INVALID_FORMAT))?;
    // Unescaped standard base64 in a query string turns '+' into ' '
    let data = data.trim().replace(' ', "+");

    if let Some(key) = signing_key {
        let sig = sig.ok_or_else(|| invalid("This shareable link is not signed"))?;
        if !verify(key, &data, &sig) {
            tracing::warn!("Share link signature mismatch");
            return Err(invalid("This shareable link has been modified"));
        }
    }

    let bytes = decode_base64(&data).ok_or_else(|| invalid(INVALID_FORMAT))?;
    let json = String::from_utf8(bytes).map_err(|_| invalid(INVALID_FORMAT))?;
    let snapshot: ShareSnapshot = serde_json::from_str(&json).map_err(|e| {
        tracing::debug!(error = %e, "Share link JSON rejected");
        invalid(INVALID_FORMAT)
    })?;

    if snapshot.v != SNAPSHOT_VERSION {
        return Err(invalid(&format!(
            "Unsupported shareable link version {}. Please ask for a new link.",
            snapshot.v
        )));
    }

    snapshot.validate().map_err(|errors| {
        let fields = errors.field_errors();
        if fields.contains_key("user_id") || fields.contains_key("display_name") {
            invalid(MISSING_USER_INFO)
        } else {
            invalid(NO_DATA)
        }
    })?;

    Ok(snapshot)
}

fn invalid(msg: &str) -> AppError {
    AppError::InvalidShareLink(msg.to_string())
}

/// Accept URL-safe or standard alphabet, with or without padding.
fn decode_base64(data: &str) -> Option<Vec<u8>> {
    let unpadded = data.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
        .ok()
}

fn sign(key: &[u8], data: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time signature check.
fn verify(key: &[u8], data: &str, sig_hex: &str) -> bool {
    let Ok(sig) = hex::decode(sig_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(data.as_bytes());
    mac.verify_slice(&sig).is_ok()
}
