use serde::{Deserialize, Serialize};

use crate::pubkey::Pubkey;
use crate::state::impl_record;

/// A track, keyed by (title, artist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Seconds
    pub duration: u64,
    pub audio_url: String,
    pub cover_image: String,
    pub likes_count: u64,
    pub plays_count: u64,
    pub created_by: Pubkey,
    pub created_at: i64,
}

impl_record!(Track => Track {
    title,
    artist,
    album,
    genre,
    duration,
    audio_url,
    cover_image,
    likes_count,
    plays_count,
    created_by,
    created_at,
});

/// One play event. The play timestamp is part of the address, so repeated
/// plays of the same track never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPlay {
    pub track: Pubkey,
    pub user: Pubkey,
    pub duration_played: u64,
    pub created_at: i64,
}

impl_record!(TrackPlay => TrackPlay {
    track,
    user,
    duration_played,
    created_at,
});
