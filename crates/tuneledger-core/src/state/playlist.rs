use serde::{Deserialize, Serialize};

use crate::pubkey::Pubkey;
use crate::state::impl_record;

pub const PERMISSION_ADD_TRACKS: u8 = 1;
pub const PERMISSION_REMOVE_TRACKS: u8 = 2;
pub const PERMISSION_EDIT_INFO: u8 = 4;
pub const PERMISSION_ALL: u8 = PERMISSION_ADD_TRACKS | PERMISSION_REMOVE_TRACKS | PERMISSION_EDIT_INFO;

/// A playlist, unique per (owner, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub authority: Pubkey,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub is_collaborative: bool,
    pub tracks_count: u64,
    pub likes_count: u64,
    pub plays_count: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_record!(Playlist => Playlist {
    authority,
    name,
    description,
    is_public,
    is_collaborative,
    tracks_count,
    likes_count,
    plays_count,
    created_at,
    updated_at,
});

/// Membership of a track in a playlist.
///
/// `position` is the playlist's track count when the row was added. Removing
/// a track does not renumber the others, so positions are stable markers
/// rather than a dense index and may repeat after a removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub playlist: Pubkey,
    pub track: Pubkey,
    pub added_by: Pubkey,
    pub position: u64,
    pub added_at: i64,
}

impl_record!(PlaylistTrack => PlaylistTrack {
    playlist,
    track,
    added_by,
    position,
    added_at,
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistCollaborator {
    pub playlist: Pubkey,
    pub user: Pubkey,
    /// Bitmask of `PERMISSION_*`
    pub permissions: u8,
    pub added_at: i64,
}

impl_record!(PlaylistCollaborator => PlaylistCollaborator {
    playlist,
    user,
    permissions,
    added_at,
});

impl PlaylistCollaborator {
    pub fn allows(&self, permission: u8) -> bool {
        self.permissions & permission == permission
    }
}
