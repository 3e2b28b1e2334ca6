//! Record schemas.
//!
//! Each record kind has a fixed field layout prefixed by its discriminator.
//! Records reference each other by address only.

mod analytics;
mod playlist;
mod social;
mod track;
mod user;

pub use analytics::{Recommendation, SearchIndex, UserInsights};
pub use playlist::{
    Playlist, PlaylistCollaborator, PlaylistTrack, PERMISSION_ADD_TRACKS, PERMISSION_ALL,
    PERMISSION_EDIT_INFO, PERMISSION_REMOVE_TRACKS,
};
pub use social::{ActivityFeed, ActivityType, PlaylistLike, TrackLike, UserFollow};
pub use track::{Track, TrackPlay};
pub use user::{UserProfile, UserStats};

use serde::Serialize;

use crate::address::SeedTag;
use crate::codec::{Decode, Encode, Reader, Writer};
use crate::discriminator::{record, Discriminator};
use crate::error::{Result, TuneLedgerError};

/// Every record kind the ledger stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecordKind {
    UserProfile,
    UserStats,
    Track,
    TrackPlay,
    Playlist,
    PlaylistTrack,
    PlaylistCollaborator,
    TrackLike,
    PlaylistLike,
    UserFollow,
    ActivityFeed,
    Recommendation,
    SearchIndex,
    UserInsights,
}

impl RecordKind {
    pub const ALL: [RecordKind; 14] = [
        RecordKind::UserProfile,
        RecordKind::UserStats,
        RecordKind::Track,
        RecordKind::TrackPlay,
        RecordKind::Playlist,
        RecordKind::PlaylistTrack,
        RecordKind::PlaylistCollaborator,
        RecordKind::TrackLike,
        RecordKind::PlaylistLike,
        RecordKind::UserFollow,
        RecordKind::ActivityFeed,
        RecordKind::Recommendation,
        RecordKind::SearchIndex,
        RecordKind::UserInsights,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::UserProfile => "UserProfile",
            RecordKind::UserStats => "UserStats",
            RecordKind::Track => "Track",
            RecordKind::TrackPlay => "TrackPlay",
            RecordKind::Playlist => "Playlist",
            RecordKind::PlaylistTrack => "PlaylistTrack",
            RecordKind::PlaylistCollaborator => "PlaylistCollaborator",
            RecordKind::TrackLike => "TrackLike",
            RecordKind::PlaylistLike => "PlaylistLike",
            RecordKind::UserFollow => "UserFollow",
            RecordKind::ActivityFeed => "ActivityFeed",
            RecordKind::Recommendation => "Recommendation",
            RecordKind::SearchIndex => "SearchIndex",
            RecordKind::UserInsights => "UserInsights",
        }
    }

    pub const fn discriminator(&self) -> Discriminator {
        match self {
            RecordKind::UserProfile => record::USER_PROFILE,
            RecordKind::UserStats => record::USER_STATS,
            RecordKind::Track => record::TRACK,
            RecordKind::TrackPlay => record::TRACK_PLAY,
            RecordKind::Playlist => record::PLAYLIST,
            RecordKind::PlaylistTrack => record::PLAYLIST_TRACK,
            RecordKind::PlaylistCollaborator => record::PLAYLIST_COLLABORATOR,
            RecordKind::TrackLike => record::TRACK_LIKE,
            RecordKind::PlaylistLike => record::PLAYLIST_LIKE,
            RecordKind::UserFollow => record::USER_FOLLOW,
            RecordKind::ActivityFeed => record::ACTIVITY_FEED,
            RecordKind::Recommendation => record::RECOMMENDATION,
            RecordKind::SearchIndex => record::SEARCH_INDEX,
            RecordKind::UserInsights => record::USER_INSIGHTS,
        }
    }

    pub fn from_discriminator(discriminator: &Discriminator) -> Option<RecordKind> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| &kind.discriminator() == discriminator)
    }

    /// Seed tag of the addresses records of this kind live at.
    pub fn seed_tag(&self) -> SeedTag {
        match self {
            RecordKind::UserProfile => SeedTag::UserProfile,
            RecordKind::UserStats => SeedTag::UserStats,
            RecordKind::Track => SeedTag::Track,
            RecordKind::TrackPlay => SeedTag::TrackPlay,
            RecordKind::Playlist => SeedTag::Playlist,
            RecordKind::PlaylistTrack => SeedTag::PlaylistTrack,
            RecordKind::PlaylistCollaborator => SeedTag::PlaylistCollaborator,
            RecordKind::TrackLike => SeedTag::TrackLike,
            RecordKind::PlaylistLike => SeedTag::PlaylistLike,
            RecordKind::UserFollow => SeedTag::UserFollow,
            RecordKind::ActivityFeed => SeedTag::ActivityFeed,
            RecordKind::Recommendation => SeedTag::Recommendation,
            RecordKind::SearchIndex => SeedTag::SearchIndex,
            RecordKind::UserInsights => SeedTag::UserInsights,
        }
    }
}

/// A stored record: discriminator followed by the field layout.
pub trait Record: Encode + Decode {
    const KIND: RecordKind;

    /// Encode with the discriminator prefix.
    fn pack(&self) -> Vec<u8> {
        let mut writer = Writer::with_discriminator(Self::KIND.discriminator());
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode a full record, checking the discriminator and rejecting
    /// trailing bytes.
    fn unpack(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let discriminator = reader.discriminator()?;
        if discriminator != Self::KIND.discriminator() {
            return Err(TuneLedgerError::UnknownDiscriminator(discriminator));
        }
        let record = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(record)
    }
}

macro_rules! impl_record {
    ($ty:ident => $kind:ident { $($field:ident),* $(,)? }) => {
        $crate::codec::impl_layout!($ty { $($field),* });

        impl $crate::state::Record for $ty {
            const KIND: $crate::state::RecordKind = $crate::state::RecordKind::$kind;
        }

        impl From<$ty> for $crate::state::AnyRecord {
            fn from(record: $ty) -> Self {
                $crate::state::AnyRecord::$kind(record)
            }
        }
    };
}

pub(crate) use impl_record;

/// Content target of a search index or recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Track = 1,
    Playlist = 2,
    User = 3,
}

impl TargetType {
    pub fn from_u8(value: u8) -> Option<TargetType> {
        match value {
            1 => Some(TargetType::Track),
            2 => Some(TargetType::Playlist),
            3 => Some(TargetType::User),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Any record, decoded by its discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record")]
pub enum AnyRecord {
    UserProfile(UserProfile),
    UserStats(UserStats),
    Track(Track),
    TrackPlay(TrackPlay),
    Playlist(Playlist),
    PlaylistTrack(PlaylistTrack),
    PlaylistCollaborator(PlaylistCollaborator),
    TrackLike(TrackLike),
    PlaylistLike(PlaylistLike),
    UserFollow(UserFollow),
    ActivityFeed(ActivityFeed),
    Recommendation(Recommendation),
    SearchIndex(SearchIndex),
    UserInsights(UserInsights),
}

impl AnyRecord {
    pub fn decode(bytes: &[u8]) -> Result<AnyRecord> {
        let mut discriminator = [0u8; 8];
        if bytes.len() < discriminator.len() {
            return Err(TuneLedgerError::TruncatedInput {
                needed: discriminator.len(),
                remaining: bytes.len(),
            });
        }
        discriminator.copy_from_slice(&bytes[..8]);
        let kind = RecordKind::from_discriminator(&discriminator)
            .ok_or(TuneLedgerError::UnknownDiscriminator(discriminator))?;

        Ok(match kind {
            RecordKind::UserProfile => AnyRecord::UserProfile(UserProfile::unpack(bytes)?),
            RecordKind::UserStats => AnyRecord::UserStats(UserStats::unpack(bytes)?),
            RecordKind::Track => AnyRecord::Track(Track::unpack(bytes)?),
            RecordKind::TrackPlay => AnyRecord::TrackPlay(TrackPlay::unpack(bytes)?),
            RecordKind::Playlist => AnyRecord::Playlist(Playlist::unpack(bytes)?),
            RecordKind::PlaylistTrack => AnyRecord::PlaylistTrack(PlaylistTrack::unpack(bytes)?),
            RecordKind::PlaylistCollaborator => {
                AnyRecord::PlaylistCollaborator(PlaylistCollaborator::unpack(bytes)?)
            }
            RecordKind::TrackLike => AnyRecord::TrackLike(TrackLike::unpack(bytes)?),
            RecordKind::PlaylistLike => AnyRecord::PlaylistLike(PlaylistLike::unpack(bytes)?),
            RecordKind::UserFollow => AnyRecord::UserFollow(UserFollow::unpack(bytes)?),
            RecordKind::ActivityFeed => AnyRecord::ActivityFeed(ActivityFeed::unpack(bytes)?),
            RecordKind::Recommendation => {
                AnyRecord::Recommendation(Recommendation::unpack(bytes)?)
            }
            RecordKind::SearchIndex => AnyRecord::SearchIndex(SearchIndex::unpack(bytes)?),
            RecordKind::UserInsights => AnyRecord::UserInsights(UserInsights::unpack(bytes)?),
        })
    }

    /// Encode with the discriminator prefix, as the concrete record would.
    pub fn pack(&self) -> Vec<u8> {
        match self {
            AnyRecord::UserProfile(r) => r.pack(),
            AnyRecord::UserStats(r) => r.pack(),
            AnyRecord::Track(r) => r.pack(),
            AnyRecord::TrackPlay(r) => r.pack(),
            AnyRecord::Playlist(r) => r.pack(),
            AnyRecord::PlaylistTrack(r) => r.pack(),
            AnyRecord::PlaylistCollaborator(r) => r.pack(),
            AnyRecord::TrackLike(r) => r.pack(),
            AnyRecord::PlaylistLike(r) => r.pack(),
            AnyRecord::UserFollow(r) => r.pack(),
            AnyRecord::ActivityFeed(r) => r.pack(),
            AnyRecord::Recommendation(r) => r.pack(),
            AnyRecord::SearchIndex(r) => r.pack(),
            AnyRecord::UserInsights(r) => r.pack(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            AnyRecord::UserProfile(_) => RecordKind::UserProfile,
            AnyRecord::UserStats(_) => RecordKind::UserStats,
            AnyRecord::Track(_) => RecordKind::Track,
            AnyRecord::TrackPlay(_) => RecordKind::TrackPlay,
            AnyRecord::Playlist(_) => RecordKind::Playlist,
            AnyRecord::PlaylistTrack(_) => RecordKind::PlaylistTrack,
            AnyRecord::PlaylistCollaborator(_) => RecordKind::PlaylistCollaborator,
            AnyRecord::TrackLike(_) => RecordKind::TrackLike,
            AnyRecord::PlaylistLike(_) => RecordKind::PlaylistLike,
            AnyRecord::UserFollow(_) => RecordKind::UserFollow,
            AnyRecord::ActivityFeed(_) => RecordKind::ActivityFeed,
            AnyRecord::Recommendation(_) => RecordKind::Recommendation,
            AnyRecord::SearchIndex(_) => RecordKind::SearchIndex,
            AnyRecord::UserInsights(_) => RecordKind::UserInsights,
        }
    }
}
