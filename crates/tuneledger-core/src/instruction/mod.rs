//! Instructions: account lists plus encoded payloads.
//!
//! An [`Instruction`] names the program, the ordered accounts it touches and
//! the payload bytes. The payload is a [`ProtocolInstruction`]: an 8-byte
//! discriminator followed by the variant's fields.

mod builder;

pub use builder::InstructionBuilder;

use serde::Serialize;

use crate::codec::{impl_layout, Decode, Encode, Reader, Writer};
use crate::discriminator::{instruction, Discriminator};
use crate::error::{Result, TuneLedgerError};
use crate::pubkey::Pubkey;
use crate::validation;

/// One account an instruction touches, with its access flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: false,
        }
    }

    pub fn signer(pubkey: Pubkey, is_writable: bool) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable,
        }
    }
}

impl Encode for AccountMeta {
    fn encode(&self, writer: &mut Writer) {
        writer.put(&self.pubkey);
        writer.put_u8(u8::from(self.is_signer) | (u8::from(self.is_writable) << 1));
    }
}

impl Decode for AccountMeta {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let pubkey = reader.pubkey()?;
        let flags = reader.u8()?;
        if flags > 0b11 {
            return Err(TuneLedgerError::InvalidAccount(format!(
                "unknown account flags {:#04b}",
                flags
            )));
        }
        Ok(Self {
            pubkey,
            is_signer: flags & 1 != 0,
            is_writable: flags & 2 != 0,
        })
    }
}

/// A fully-formed, unsigned instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    /// Canonical bytes a signer signs.
    pub fn message(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Decode the payload.
    pub fn payload(&self) -> Result<ProtocolInstruction> {
        ProtocolInstruction::decode(&self.data)
    }

    pub fn kind(&self) -> Result<InstructionKind> {
        let mut reader = Reader::new(&self.data);
        let discriminator = reader.discriminator()?;
        InstructionKind::from_discriminator(&discriminator)
            .ok_or(TuneLedgerError::UnknownDiscriminator(discriminator))
    }

    /// Accounts flagged as signers.
    pub fn signers(&self) -> impl Iterator<Item = &Pubkey> {
        self.accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| &meta.pubkey)
    }
}

impl Encode for Instruction {
    fn encode(&self, writer: &mut Writer) {
        writer.put(&self.program_id);
        writer.put_u32(self.accounts.len() as u32);
        for meta in &self.accounts {
            writer.put(meta);
        }
        writer.put_u32(self.data.len() as u32);
        writer.put_bytes(&self.data);
    }
}

impl Decode for Instruction {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let program_id = reader.pubkey()?;
        let count = reader.u32()? as usize;
        // Each meta is 33 bytes; reject counts the buffer cannot hold before allocating.
        if count.saturating_mul(33) > reader.remaining() {
            return Err(TuneLedgerError::TruncatedInput {
                needed: count.saturating_mul(33),
                remaining: reader.remaining(),
            });
        }
        let mut accounts: Vec<AccountMeta> = Vec::with_capacity(count);
        for _ in 0..count {
            accounts.push(reader.get()?);
        }
        let len = reader.u32()? as usize;
        let data = reader.take(len)?.to_vec();
        Ok(Self {
            program_id,
            accounts,
            data,
        })
    }
}

/// Every instruction the ledger accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    CreateUserProfile,
    UpdateUserProfile,
    CreateTrack,
    PlayTrack,
    CreatePlaylist,
    UpdatePlaylist,
    AddTrackToPlaylist,
    RemoveTrackFromPlaylist,
    AddCollaborator,
    LikeTrack,
    UnlikeTrack,
    LikePlaylist,
    UnlikePlaylist,
    FollowUser,
    UnfollowUser,
    RecordActivity,
    CreateSearchIndex,
    GenerateUserInsights,
    CreateRecommendation,
    MarkRecommendationViewed,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 20] = [
        InstructionKind::CreateUserProfile,
        InstructionKind::UpdateUserProfile,
        InstructionKind::CreateTrack,
        InstructionKind::PlayTrack,
        InstructionKind::CreatePlaylist,
        InstructionKind::UpdatePlaylist,
        InstructionKind::AddTrackToPlaylist,
        InstructionKind::RemoveTrackFromPlaylist,
        InstructionKind::AddCollaborator,
        InstructionKind::LikeTrack,
        InstructionKind::UnlikeTrack,
        InstructionKind::LikePlaylist,
        InstructionKind::UnlikePlaylist,
        InstructionKind::FollowUser,
        InstructionKind::UnfollowUser,
        InstructionKind::RecordActivity,
        InstructionKind::CreateSearchIndex,
        InstructionKind::GenerateUserInsights,
        InstructionKind::CreateRecommendation,
        InstructionKind::MarkRecommendationViewed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InstructionKind::CreateUserProfile => "create_user_profile",
            InstructionKind::UpdateUserProfile => "update_user_profile",
            InstructionKind::CreateTrack => "create_track",
            InstructionKind::PlayTrack => "play_track",
            InstructionKind::CreatePlaylist => "create_playlist",
            InstructionKind::UpdatePlaylist => "update_playlist",
            InstructionKind::AddTrackToPlaylist => "add_track_to_playlist",
            InstructionKind::RemoveTrackFromPlaylist => "remove_track_from_playlist",
            InstructionKind::AddCollaborator => "add_collaborator",
            InstructionKind::LikeTrack => "like_track",
            InstructionKind::UnlikeTrack => "unlike_track",
            InstructionKind::LikePlaylist => "like_playlist",
            InstructionKind::UnlikePlaylist => "unlike_playlist",
            InstructionKind::FollowUser => "follow_user",
            InstructionKind::UnfollowUser => "unfollow_user",
            InstructionKind::RecordActivity => "record_activity",
            InstructionKind::CreateSearchIndex => "create_search_index",
            InstructionKind::GenerateUserInsights => "generate_user_insights",
            InstructionKind::CreateRecommendation => "create_recommendation",
            InstructionKind::MarkRecommendationViewed => "mark_recommendation_viewed",
        }
    }

    pub const fn discriminator(&self) -> Discriminator {
        match self {
            InstructionKind::CreateUserProfile => instruction::CREATE_USER_PROFILE,
            InstructionKind::UpdateUserProfile => instruction::UPDATE_USER_PROFILE,
            InstructionKind::CreateTrack => instruction::CREATE_TRACK,
            InstructionKind::PlayTrack => instruction::PLAY_TRACK,
            InstructionKind::CreatePlaylist => instruction::CREATE_PLAYLIST,
            InstructionKind::UpdatePlaylist => instruction::UPDATE_PLAYLIST,
            InstructionKind::AddTrackToPlaylist => instruction::ADD_TRACK_TO_PLAYLIST,
            InstructionKind::RemoveTrackFromPlaylist => instruction::REMOVE_TRACK_FROM_PLAYLIST,
            InstructionKind::AddCollaborator => instruction::ADD_COLLABORATOR,
            InstructionKind::LikeTrack => instruction::LIKE_TRACK,
            InstructionKind::UnlikeTrack => instruction::UNLIKE_TRACK,
            InstructionKind::LikePlaylist => instruction::LIKE_PLAYLIST,
            InstructionKind::UnlikePlaylist => instruction::UNLIKE_PLAYLIST,
            InstructionKind::FollowUser => instruction::FOLLOW_USER,
            InstructionKind::UnfollowUser => instruction::UNFOLLOW_USER,
            InstructionKind::RecordActivity => instruction::RECORD_ACTIVITY,
            InstructionKind::CreateSearchIndex => instruction::CREATE_SEARCH_INDEX,
            InstructionKind::GenerateUserInsights => instruction::GENERATE_USER_INSIGHTS,
            InstructionKind::CreateRecommendation => instruction::CREATE_RECOMMENDATION,
            InstructionKind::MarkRecommendationViewed => instruction::MARK_RECOMMENDATION_VIEWED,
        }
    }

    pub fn from_discriminator(discriminator: &Discriminator) -> Option<InstructionKind> {
        InstructionKind::ALL
            .into_iter()
            .find(|kind| &kind.discriminator() == discriminator)
    }
}

// --- Payloads ---

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateUserProfile {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub profile_image: String,
}

impl_layout!(CreateUserProfile {
    username,
    display_name,
    bio,
    profile_image,
});

impl CreateUserProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    pub fn with_profile_image(mut self, profile_image: impl Into<String>) -> Self {
        self.profile_image = profile_image.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::user_profile(
            &self.username,
            &self.display_name,
            &self.bio,
            &self.profile_image,
        )
    }
}

/// Partial profile update. `None` leaves a field untouched; `Some("")`
/// clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateUserProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

impl_layout!(UpdateUserProfile {
    display_name,
    bio,
    profile_image,
});

impl UpdateUserProfile {
    pub fn validate(&self) -> Result<()> {
        validation::profile_update(
            self.display_name.as_deref(),
            self.bio.as_deref(),
            self.profile_image.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: u64,
    pub audio_url: String,
    pub cover_image: String,
}

impl_layout!(CreateTrack {
    title,
    artist,
    album,
    genre,
    duration,
    audio_url,
    cover_image,
});

impl CreateTrack {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration: u64) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            duration,
            ..Self::default()
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_audio_url(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = audio_url.into();
        self
    }

    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = cover_image.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::track(
            &self.title,
            &self.artist,
            &self.album,
            &self.genre,
            self.duration,
            &self.audio_url,
            &self.cover_image,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayTrack {
    pub duration_played: u64,
    /// Unix seconds; part of the play's address
    pub played_at: i64,
}

impl_layout!(PlayTrack {
    duration_played,
    played_at,
});

impl PlayTrack {
    pub fn validate(&self) -> Result<()> {
        validation::seed_timestamp("played at", self.played_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub is_collaborative: bool,
}

impl_layout!(CreatePlaylist {
    name,
    description,
    is_public,
    is_collaborative,
});

impl CreatePlaylist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: true,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_collaborative(mut self, is_collaborative: bool) -> Self {
        self.is_collaborative = is_collaborative;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::playlist(&self.name, &self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdatePlaylist {
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
}

impl_layout!(UpdatePlaylist {
    description,
    is_public,
    is_collaborative,
});

impl UpdatePlaylist {
    pub fn validate(&self) -> Result<()> {
        validation::playlist_update(self.description.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCollaborator {
    pub permissions: u8,
}

impl_layout!(AddCollaborator { permissions });

impl AddCollaborator {
    pub fn validate(&self) -> Result<()> {
        validation::permissions(self.permissions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordActivity {
    pub activity_type: u8,
    pub target: Pubkey,
    pub metadata: String,
    /// Unix seconds; part of the activity's address
    pub timestamp: i64,
}

impl_layout!(RecordActivity {
    activity_type,
    target,
    metadata,
    timestamp,
});

impl RecordActivity {
    pub fn validate(&self) -> Result<()> {
        validation::activity(self.activity_type, &self.metadata, self.timestamp)
    }
}

/// The term travels as the caller typed it; both sides normalize it before
/// deriving the index address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSearchIndex {
    pub search_term: String,
    pub target_type: u8,
    pub target: Pubkey,
}

impl_layout!(CreateSearchIndex {
    search_term,
    target_type,
    target,
});

impl CreateSearchIndex {
    /// Returns the normalized term.
    pub fn validate(&self) -> Result<String> {
        validation::target_type("target type", self.target_type)?;
        validation::search_term(&self.search_term)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateRecommendation {
    pub recommendation_type: u8,
    pub target: Pubkey,
    pub score: f32,
    pub reason: String,
}

impl_layout!(CreateRecommendation {
    recommendation_type,
    target,
    score,
    reason,
});

impl CreateRecommendation {
    pub fn validate(&self) -> Result<()> {
        validation::recommendation(self.recommendation_type, self.score, &self.reason)
    }
}

/// Decoded instruction payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolInstruction {
    CreateUserProfile(CreateUserProfile),
    UpdateUserProfile(UpdateUserProfile),
    CreateTrack(CreateTrack),
    PlayTrack(PlayTrack),
    CreatePlaylist(CreatePlaylist),
    UpdatePlaylist(UpdatePlaylist),
    AddTrackToPlaylist,
    RemoveTrackFromPlaylist,
    AddCollaborator(AddCollaborator),
    LikeTrack,
    UnlikeTrack,
    LikePlaylist,
    UnlikePlaylist,
    FollowUser,
    UnfollowUser,
    RecordActivity(RecordActivity),
    CreateSearchIndex(CreateSearchIndex),
    GenerateUserInsights,
    CreateRecommendation(CreateRecommendation),
    MarkRecommendationViewed,
}

impl ProtocolInstruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            ProtocolInstruction::CreateUserProfile(_) => InstructionKind::CreateUserProfile,
            ProtocolInstruction::UpdateUserProfile(_) => InstructionKind::UpdateUserProfile,
            ProtocolInstruction::CreateTrack(_) => InstructionKind::CreateTrack,
            ProtocolInstruction::PlayTrack(_) => InstructionKind::PlayTrack,
            ProtocolInstruction::CreatePlaylist(_) => InstructionKind::CreatePlaylist,
            ProtocolInstruction::UpdatePlaylist(_) => InstructionKind::UpdatePlaylist,
            ProtocolInstruction::AddTrackToPlaylist => InstructionKind::AddTrackToPlaylist,
            ProtocolInstruction::RemoveTrackFromPlaylist => InstructionKind::RemoveTrackFromPlaylist,
            ProtocolInstruction::AddCollaborator(_) => InstructionKind::AddCollaborator,
            ProtocolInstruction::LikeTrack => InstructionKind::LikeTrack,
            ProtocolInstruction::UnlikeTrack => InstructionKind::UnlikeTrack,
            ProtocolInstruction::LikePlaylist => InstructionKind::LikePlaylist,
            ProtocolInstruction::UnlikePlaylist => InstructionKind::UnlikePlaylist,
            ProtocolInstruction::FollowUser => InstructionKind::FollowUser,
            ProtocolInstruction::UnfollowUser => InstructionKind::UnfollowUser,
            ProtocolInstruction::RecordActivity(_) => InstructionKind::RecordActivity,
            ProtocolInstruction::CreateSearchIndex(_) => InstructionKind::CreateSearchIndex,
            ProtocolInstruction::GenerateUserInsights => InstructionKind::GenerateUserInsights,
            ProtocolInstruction::CreateRecommendation(_) => InstructionKind::CreateRecommendation,
            ProtocolInstruction::MarkRecommendationViewed => {
                InstructionKind::MarkRecommendationViewed
            }
        }
    }

    /// Discriminator followed by the payload fields.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::with_discriminator(self.kind().discriminator());
        match self {
            ProtocolInstruction::CreateUserProfile(args) => writer.put(args),
            ProtocolInstruction::UpdateUserProfile(args) => writer.put(args),
            ProtocolInstruction::CreateTrack(args) => writer.put(args),
            ProtocolInstruction::PlayTrack(args) => writer.put(args),
            ProtocolInstruction::CreatePlaylist(args) => writer.put(args),
            ProtocolInstruction::UpdatePlaylist(args) => writer.put(args),
            ProtocolInstruction::AddCollaborator(args) => writer.put(args),
            ProtocolInstruction::RecordActivity(args) => writer.put(args),
            ProtocolInstruction::CreateSearchIndex(args) => writer.put(args),
            ProtocolInstruction::CreateRecommendation(args) => writer.put(args),
            ProtocolInstruction::AddTrackToPlaylist
            | ProtocolInstruction::RemoveTrackFromPlaylist
            | ProtocolInstruction::LikeTrack
            | ProtocolInstruction::UnlikeTrack
            | ProtocolInstruction::LikePlaylist
            | ProtocolInstruction::UnlikePlaylist
            | ProtocolInstruction::FollowUser
            | ProtocolInstruction::UnfollowUser
            | ProtocolInstruction::GenerateUserInsights
            | ProtocolInstruction::MarkRecommendationViewed => {}
        }
        writer.into_bytes()
    }

    /// Strict decode: unknown discriminators and trailing bytes fail.
    pub fn decode(bytes: &[u8]) -> Result<ProtocolInstruction> {
        let mut reader = Reader::new(bytes);
        let discriminator = reader.discriminator()?;
        let kind = InstructionKind::from_discriminator(&discriminator)
            .ok_or(TuneLedgerError::UnknownDiscriminator(discriminator))?;

        let decoded = match kind {
            InstructionKind::CreateUserProfile => {
                ProtocolInstruction::CreateUserProfile(reader.get()?)
            }
            InstructionKind::UpdateUserProfile => {
                ProtocolInstruction::UpdateUserProfile(reader.get()?)
            }
            InstructionKind::CreateTrack => ProtocolInstruction::CreateTrack(reader.get()?),
            InstructionKind::PlayTrack => ProtocolInstruction::PlayTrack(reader.get()?),
            InstructionKind::CreatePlaylist => ProtocolInstruction::CreatePlaylist(reader.get()?),
            InstructionKind::UpdatePlaylist => ProtocolInstruction::UpdatePlaylist(reader.get()?),
            InstructionKind::AddTrackToPlaylist => ProtocolInstruction::AddTrackToPlaylist,
            InstructionKind::RemoveTrackFromPlaylist => {
                ProtocolInstruction::RemoveTrackFromPlaylist
            }
            InstructionKind::AddCollaborator => {
                ProtocolInstruction::AddCollaborator(reader.get()?)
            }
            InstructionKind::LikeTrack => ProtocolInstruction::LikeTrack,
            InstructionKind::UnlikeTrack => ProtocolInstruction::UnlikeTrack,
            InstructionKind::LikePlaylist => ProtocolInstruction::LikePlaylist,
            InstructionKind::UnlikePlaylist => ProtocolInstruction::UnlikePlaylist,
            InstructionKind::FollowUser => ProtocolInstruction::FollowUser,
            InstructionKind::UnfollowUser => ProtocolInstruction::UnfollowUser,
            InstructionKind::RecordActivity => ProtocolInstruction::RecordActivity(reader.get()?),
            InstructionKind::CreateSearchIndex => {
                ProtocolInstruction::CreateSearchIndex(reader.get()?)
            }
            InstructionKind::GenerateUserInsights => ProtocolInstruction::GenerateUserInsights,
            InstructionKind::CreateRecommendation => {
                ProtocolInstruction::CreateRecommendation(reader.get()?)
            }
            InstructionKind::MarkRecommendationViewed => {
                ProtocolInstruction::MarkRecommendationViewed
            }
        };
        reader.finish()?;
        Ok(decoded)
    }

    /// Field-level checks that need no ledger state.
    pub fn validate(&self) -> Result<()> {
        match self {
            ProtocolInstruction::CreateUserProfile(args) => args.validate(),
            ProtocolInstruction::UpdateUserProfile(args) => args.validate(),
            ProtocolInstruction::CreateTrack(args) => args.validate(),
            ProtocolInstruction::PlayTrack(args) => args.validate(),
            ProtocolInstruction::CreatePlaylist(args) => args.validate(),
            ProtocolInstruction::UpdatePlaylist(args) => args.validate(),
            ProtocolInstruction::AddCollaborator(args) => args.validate(),
            ProtocolInstruction::RecordActivity(args) => args.validate(),
            ProtocolInstruction::CreateSearchIndex(args) => args.validate().map(|_| ()),
            ProtocolInstruction::CreateRecommendation(args) => args.validate(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_starts_with_discriminator() {
        let payload = ProtocolInstruction::CreateUserProfile(CreateUserProfile::new("testuser"));
        let bytes = payload.encode();
        assert_eq!(&bytes[..8], &instruction::CREATE_USER_PROFILE);
        assert_eq!(ProtocolInstruction::decode(&bytes).unwrap(), payload);
    }

    fn sample(kind: InstructionKind) -> ProtocolInstruction {
        let target = Pubkey::new([5; 32]);
        match kind {
            InstructionKind::CreateUserProfile => ProtocolInstruction::CreateUserProfile(
                CreateUserProfile::new("testuser")
                    .with_display_name("Test User")
                    .with_bio("hi")
                    .with_profile_image("https://example.com/me.png"),
            ),
            InstructionKind::UpdateUserProfile => {
                ProtocolInstruction::UpdateUserProfile(UpdateUserProfile {
                    display_name: Some("Renamed".to_string()),
                    bio: Some(String::new()),
                    profile_image: None,
                })
            }
            InstructionKind::CreateTrack => ProtocolInstruction::CreateTrack(
                CreateTrack::new("Test Song", "Test Artist", 180)
                    .with_album("Demo")
                    .with_genre("Rock")
                    .with_audio_url("https://example.com/a.mp3")
                    .with_cover_image("https://example.com/a.png"),
            ),
            InstructionKind::PlayTrack => ProtocolInstruction::PlayTrack(PlayTrack {
                duration_played: 95,
                played_at: 1_700_000_000,
            }),
            InstructionKind::CreatePlaylist => ProtocolInstruction::CreatePlaylist(
                CreatePlaylist::new("Road Trip")
                    .with_description("long drives")
                    .with_public(false)
                    .with_collaborative(true),
            ),
            InstructionKind::UpdatePlaylist => ProtocolInstruction::UpdatePlaylist(UpdatePlaylist {
                description: None,
                is_public: Some(true),
                is_collaborative: Some(false),
            }),
            InstructionKind::AddTrackToPlaylist => ProtocolInstruction::AddTrackToPlaylist,
            InstructionKind::RemoveTrackFromPlaylist => ProtocolInstruction::RemoveTrackFromPlaylist,
            InstructionKind::AddCollaborator => {
                ProtocolInstruction::AddCollaborator(AddCollaborator { permissions: 5 })
            }
            InstructionKind::LikeTrack => ProtocolInstruction::LikeTrack,
            InstructionKind::UnlikeTrack => ProtocolInstruction::UnlikeTrack,
            InstructionKind::LikePlaylist => ProtocolInstruction::LikePlaylist,
            InstructionKind::UnlikePlaylist => ProtocolInstruction::UnlikePlaylist,
            InstructionKind::FollowUser => ProtocolInstruction::FollowUser,
            InstructionKind::UnfollowUser => ProtocolInstruction::UnfollowUser,
            InstructionKind::RecordActivity => ProtocolInstruction::RecordActivity(RecordActivity {
                activity_type: 3,
                target,
                metadata: "followed".to_string(),
                timestamp: 1_700_000_100,
            }),
            InstructionKind::CreateSearchIndex => {
                ProtocolInstruction::CreateSearchIndex(CreateSearchIndex {
                    search_term: " Rock ".to_string(),
                    target_type: 1,
                    target,
                })
            }
            InstructionKind::GenerateUserInsights => ProtocolInstruction::GenerateUserInsights,
            InstructionKind::CreateRecommendation => {
                ProtocolInstruction::CreateRecommendation(CreateRecommendation {
                    recommendation_type: 2,
                    target,
                    score: 0.5,
                    reason: "similar taste".to_string(),
                })
            }
            InstructionKind::MarkRecommendationViewed => {
                ProtocolInstruction::MarkRecommendationViewed
            }
        }
    }

    #[test]
    fn test_every_payload_survives_encode_and_decode() {
        for kind in InstructionKind::ALL {
            let payload = sample(kind);
            assert_eq!(payload.kind(), kind);
            let bytes = payload.encode();
            assert_eq!(&bytes[..8], &kind.discriminator());
            assert_eq!(ProtocolInstruction::decode(&bytes).unwrap(), payload, "{}", kind.name());
        }
    }

    #[test]
    fn test_unit_payload_is_discriminator_only() {
        let bytes = ProtocolInstruction::LikeTrack.encode();
        assert_eq!(bytes, instruction::LIKE_TRACK.to_vec());
    }

    #[test]
    fn test_decode_rejects_unknown_and_trailing() {
        assert!(matches!(
            ProtocolInstruction::decode(&[9u8; 8]),
            Err(TuneLedgerError::UnknownDiscriminator([9, 9, 9, 9, 9, 9, 9, 9]))
        ));

        let mut bytes = ProtocolInstruction::FollowUser.encode();
        bytes.push(0);
        assert!(matches!(
            ProtocolInstruction::decode(&bytes),
            Err(TuneLedgerError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_update_distinguishes_absent_from_empty() {
        let clear_bio = ProtocolInstruction::UpdateUserProfile(UpdateUserProfile {
            bio: Some(String::new()),
            ..UpdateUserProfile::default()
        });
        let untouched = ProtocolInstruction::UpdateUserProfile(UpdateUserProfile::default());
        assert_ne!(clear_bio.encode(), untouched.encode());
        assert_eq!(
            ProtocolInstruction::decode(&clear_bio.encode()).unwrap(),
            clear_bio
        );
    }

    #[test]
    fn test_instruction_message_layout() {
        let instruction = Instruction {
            program_id: Pubkey::new([1; 32]),
            accounts: vec![
                AccountMeta::writable(Pubkey::new([2; 32])),
                AccountMeta::signer(Pubkey::new([3; 32]), true),
            ],
            data: vec![7, 7],
        };
        let message = instruction.message();
        assert_eq!(message.len(), 32 + 4 + 2 * 33 + 4 + 2);
        assert_eq!(message[32 + 4 + 32], 0b10);
        assert_eq!(message[32 + 4 + 33 + 32], 0b11);
        assert_eq!(
            crate::codec::decode_exact::<Instruction>(&message).unwrap(),
            instruction
        );
        assert_eq!(
            instruction.signers().collect::<Vec<_>>(),
            vec![&Pubkey::new([3; 32])]
        );
    }

    #[test]
    fn test_oversized_account_count_is_truncated_input() {
        let mut writer = Writer::new();
        writer.put(&Pubkey::default());
        writer.put_u32(u32::MAX);
        let bytes = writer.into_bytes();
        assert!(matches!(
            crate::codec::decode_exact::<Instruction>(&bytes),
            Err(TuneLedgerError::TruncatedInput { .. })
        ));
    }
}
