use serde::{Deserialize, Serialize};

use crate::pubkey::Pubkey;
use crate::state::impl_record;

/// One recommendation per (user, target, type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user: Pubkey,
    pub recommendation_type: u8,
    pub target: Pubkey,
    /// 0.0..=1.0
    pub score: f32,
    pub reason: String,
    pub created_at: i64,
    pub is_viewed: bool,
}

impl_record!(Recommendation => Recommendation {
    user,
    recommendation_type,
    target,
    score,
    reason,
    created_at,
    is_viewed,
});

/// Maps a normalized search term to one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub search_term: String,
    pub target_type: u8,
    pub target_pubkey: Pubkey,
    pub created_at: i64,
}

impl_record!(SearchIndex => SearchIndex {
    search_term,
    target_type,
    target_pubkey,
    created_at,
});

/// Listening summary, regenerated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInsights {
    pub user: Pubkey,
    /// Seconds, summed over folded plays
    pub total_listening_time: u64,
    pub favorite_genre: String,
    pub most_played_track: Option<Pubkey>,
    pub discovery_score: f32,
    pub social_engagement: f32,
    pub generated_at: i64,
}

impl_record!(UserInsights => UserInsights {
    user,
    total_listening_time,
    favorite_genre,
    most_played_track,
    discovery_score,
    social_engagement,
    generated_at,
});
