//! Field validation shared by instruction builders and the ledger engine.
//!
//! Both sides call the same functions, so an instruction accepted locally is
//! never rejected on submission for a field-level reason. Lengths are UTF-8
//! byte lengths.

use crate::error::{Result, TuneLedgerError};
use crate::pubkey::Pubkey;
use crate::state::{ActivityType, TargetType, PERMISSION_ALL};

pub const MAX_USERNAME_LEN: usize = 32;
pub const MAX_DISPLAY_NAME_LEN: usize = 64;
pub const MAX_BIO_LEN: usize = 256;
pub const MAX_URL_LEN: usize = 256;
pub const MAX_TITLE_LEN: usize = 128;
pub const MAX_ARTIST_LEN: usize = 64;
pub const MAX_ALBUM_LEN: usize = 64;
pub const MAX_GENRE_LEN: usize = 32;
pub const MAX_PLAYLIST_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 256;
pub const MAX_SEARCH_TERM_LEN: usize = 64;
pub const MAX_REASON_LEN: usize = 128;
pub const MAX_METADATA_LEN: usize = 64;

fn invalid(message: impl Into<String>) -> TuneLedgerError {
    TuneLedgerError::Validation(message.into())
}

/// Require `value` to be non-empty and at most `max` bytes.
pub fn required(field: &str, value: &str, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(format!("{} must not be empty", field)));
    }
    bounded(field, value, max)
}

/// Require `value` to be at most `max` bytes.
pub fn bounded(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(invalid(format!(
            "{} must be at most {} bytes, got {}",
            field,
            max,
            value.len()
        )));
    }
    Ok(())
}

pub fn user_profile(username: &str, display_name: &str, bio: &str, profile_image: &str) -> Result<()> {
    required("username", username, MAX_USERNAME_LEN)?;
    bounded("display name", display_name, MAX_DISPLAY_NAME_LEN)?;
    bounded("bio", bio, MAX_BIO_LEN)?;
    bounded("profile image", profile_image, MAX_URL_LEN)
}

pub fn profile_update(
    display_name: Option<&str>,
    bio: Option<&str>,
    profile_image: Option<&str>,
) -> Result<()> {
    if let Some(value) = display_name {
        bounded("display name", value, MAX_DISPLAY_NAME_LEN)?;
    }
    if let Some(value) = bio {
        bounded("bio", value, MAX_BIO_LEN)?;
    }
    if let Some(value) = profile_image {
        bounded("profile image", value, MAX_URL_LEN)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn track(
    title: &str,
    artist: &str,
    album: &str,
    genre: &str,
    duration: u64,
    audio_url: &str,
    cover_image: &str,
) -> Result<()> {
    required("title", title, MAX_TITLE_LEN)?;
    required("artist", artist, MAX_ARTIST_LEN)?;
    bounded("album", album, MAX_ALBUM_LEN)?;
    bounded("genre", genre, MAX_GENRE_LEN)?;
    if duration == 0 {
        return Err(invalid("duration must be greater than zero"));
    }
    bounded("audio url", audio_url, MAX_URL_LEN)?;
    bounded("cover image", cover_image, MAX_URL_LEN)
}

pub fn playlist(name: &str, description: &str) -> Result<()> {
    required("playlist name", name, MAX_PLAYLIST_NAME_LEN)?;
    bounded("description", description, MAX_DESCRIPTION_LEN)
}

pub fn playlist_update(description: Option<&str>) -> Result<()> {
    match description {
        Some(value) => bounded("description", value, MAX_DESCRIPTION_LEN),
        None => Ok(()),
    }
}

pub fn permissions(mask: u8) -> Result<()> {
    if mask == 0 || mask & !PERMISSION_ALL != 0 {
        return Err(invalid(format!(
            "permissions must be a mask in 1..={}, got {}",
            PERMISSION_ALL, mask
        )));
    }
    Ok(())
}

pub fn target_type(field: &str, value: u8) -> Result<TargetType> {
    TargetType::from_u8(value).ok_or_else(|| {
        invalid(format!(
            "{} must be 1 (track), 2 (playlist) or 3 (user), got {}",
            field, value
        ))
    })
}

pub fn activity_type(value: u8) -> Result<ActivityType> {
    ActivityType::from_u8(value)
        .ok_or_else(|| invalid(format!("activity type must be in 1..=6, got {}", value)))
}

/// Trim and lowercase a search term. Applied before address derivation so
/// every spelling of a term shares one index record.
pub fn normalize_search_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Validate a search term and return its normalized form.
pub fn search_term(term: &str) -> Result<String> {
    let normalized = normalize_search_term(term);
    required("search term", &normalized, MAX_SEARCH_TERM_LEN)?;
    Ok(normalized)
}

pub fn recommendation(recommendation_type: u8, score: f32, reason: &str) -> Result<()> {
    target_type("recommendation type", recommendation_type)?;
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(invalid(format!("score must be within 0.0..=1.0, got {}", score)));
    }
    bounded("reason", reason, MAX_REASON_LEN)
}

pub fn activity(activity_type_tag: u8, metadata: &str, timestamp: i64) -> Result<()> {
    activity_type(activity_type_tag)?;
    bounded("metadata", metadata, MAX_METADATA_LEN)?;
    seed_timestamp("activity timestamp", timestamp)
}

/// Timestamps used as address seeds must be positive.
pub fn seed_timestamp(field: &str, timestamp: i64) -> Result<()> {
    if timestamp <= 0 {
        return Err(invalid(format!("{} must be positive, got {}", field, timestamp)));
    }
    Ok(())
}

/// Reject relationships from a key to itself (self-follow, self-collaboration).
pub fn distinct(relation: &str, from: &Pubkey, to: &Pubkey) -> Result<()> {
    if from == to {
        return Err(invalid(format!("cannot {} yourself", relation)));
    }
    Ok(())
}
