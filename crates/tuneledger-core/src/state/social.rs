use serde::{Deserialize, Serialize};

use crate::pubkey::Pubkey;
use crate::state::impl_record;

/// The existence of this record is the like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLike {
    pub user: Pubkey,
    pub track: Pubkey,
    pub created_at: i64,
}

impl_record!(TrackLike => TrackLike { user, track, created_at });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistLike {
    pub user: Pubkey,
    pub playlist: Pubkey,
    pub created_at: i64,
}

impl_record!(PlaylistLike => PlaylistLike { user, playlist, created_at });

/// `follower` is the follower's key; `following` is the followed user's
/// profile address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFollow {
    pub follower: Pubkey,
    pub following: Pubkey,
    pub created_at: i64,
}

impl_record!(UserFollow => UserFollow { follower, following, created_at });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeed {
    pub user: Pubkey,
    pub activity_type: u8,
    pub target: Pubkey,
    pub metadata: String,
    pub created_at: i64,
}

impl_record!(ActivityFeed => ActivityFeed {
    user,
    activity_type,
    target,
    metadata,
    created_at,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    TrackLiked = 1,
    PlaylistLiked = 2,
    UserFollowed = 3,
    TrackCreated = 4,
    PlaylistCreated = 5,
    TrackPlayed = 6,
}

impl ActivityType {
    pub fn from_u8(value: u8) -> Option<ActivityType> {
        match value {
            1 => Some(ActivityType::TrackLiked),
            2 => Some(ActivityType::PlaylistLiked),
            3 => Some(ActivityType::UserFollowed),
            4 => Some(ActivityType::TrackCreated),
            5 => Some(ActivityType::PlaylistCreated),
            6 => Some(ActivityType::TrackPlayed),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityType::TrackLiked => "track liked",
            ActivityType::PlaylistLiked => "playlist liked",
            ActivityType::UserFollowed => "user followed",
            ActivityType::TrackCreated => "track created",
            ActivityType::PlaylistCreated => "playlist created",
            ActivityType::TrackPlayed => "track played",
        }
    }
}
