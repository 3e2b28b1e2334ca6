use serde::{Deserialize, Serialize};

use crate::pubkey::Pubkey;
use crate::state::impl_record;

/// One profile per owner key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub authority: Pubkey,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub profile_image: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub created_at: i64,
}

impl_record!(UserProfile => UserProfile {
    authority,
    username,
    display_name,
    bio,
    profile_image,
    followers_count,
    following_count,
    created_at,
});

/// Per-user activity counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user: Pubkey,
    pub tracks_created: u64,
    pub playlists_created: u64,
    pub total_likes_received: u64,
    pub total_plays: u64,
    pub last_active: i64,
}

impl_record!(UserStats => UserStats {
    user,
    tracks_created,
    playlists_created,
    total_likes_received,
    total_plays,
    last_active,
});

impl UserStats {
    pub fn new(user: Pubkey, now: i64) -> Self {
        Self {
            user,
            tracks_created: 0,
            playlists_created: 0,
            total_likes_received: 0,
            total_plays: 0,
            last_active: now,
        }
    }
}
