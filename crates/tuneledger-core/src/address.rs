//! Deterministic record address derivation.
//!
//! Every record lives at an address computed from a seed tag and an ordered
//! list of seeds. The scheme is a program-derived address: SHA-256 over the
//! length-delimited seeds, a bump byte, the program id and a fixed marker,
//! searching bumps from 255 downwards until the hash is not a valid Ed25519
//! point. Such an address has no private key, so only the ledger itself can
//! write to it.
//!
//! Each seed is prefixed with its 4-byte little-endian length, so seed
//! boundaries are part of the preimage: `["ab", "c"]` and `["a", "bc"]`
//! derive different addresses.

use std::borrow::Cow;

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use crate::error::{Result, TuneLedgerError};
use crate::pubkey::Pubkey;
use crate::validation::normalize_search_term;

/// Maximum number of seed components, tag included.
pub const MAX_SEEDS: usize = 16;

/// Maximum combined seed bytes, tag included.
pub const MAX_SEED_PAYLOAD: usize = 512;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Program id used when no other is configured.
pub const DEFAULT_PROGRAM_ID: Pubkey = Pubkey::new([
    0xad, 0xec, 0x41, 0x5e, 0x4c, 0xcf, 0xb3, 0x44, 0x9a, 0x10, 0xbb, 0xbb, 0x2d, 0xb7, 0xa0, 0x1f,
    0xf8, 0x11, 0xcd, 0x86, 0x0d, 0xdd, 0xb3, 0xe5, 0xc3, 0x71, 0x65, 0x4b, 0x59, 0xa8, 0x77, 0x4c,
]);

/// Seed-tag vocabulary. The strings are part of the wire contract and must
/// match byte-for-byte across implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedTag {
    UserProfile,
    UserStats,
    Track,
    Playlist,
    PlaylistTrack,
    TrackLike,
    PlaylistLike,
    UserFollow,
    Recommendation,
    SearchIndex,
    TrackPlay,
    PlaylistCollaborator,
    ActivityFeed,
    UserInsights,
}

impl SeedTag {
    pub const ALL: [SeedTag; 14] = [
        SeedTag::UserProfile,
        SeedTag::UserStats,
        SeedTag::Track,
        SeedTag::Playlist,
        SeedTag::PlaylistTrack,
        SeedTag::TrackLike,
        SeedTag::PlaylistLike,
        SeedTag::UserFollow,
        SeedTag::Recommendation,
        SeedTag::SearchIndex,
        SeedTag::TrackPlay,
        SeedTag::PlaylistCollaborator,
        SeedTag::ActivityFeed,
        SeedTag::UserInsights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeedTag::UserProfile => "user_profile",
            SeedTag::UserStats => "user_stats",
            SeedTag::Track => "track",
            SeedTag::Playlist => "playlist",
            SeedTag::PlaylistTrack => "playlist_track",
            SeedTag::TrackLike => "track_like",
            SeedTag::PlaylistLike => "playlist_like",
            SeedTag::UserFollow => "user_follow",
            SeedTag::Recommendation => "recommendation",
            SeedTag::SearchIndex => "search_index",
            SeedTag::TrackPlay => "track_play",
            SeedTag::PlaylistCollaborator => "playlist_collaborator",
            SeedTag::ActivityFeed => "activity_feed",
            SeedTag::UserInsights => "user_insights",
        }
    }

    pub fn parse(value: &str) -> Option<SeedTag> {
        SeedTag::ALL.into_iter().find(|tag| tag.as_str() == value)
    }
}

/// One seed component.
#[derive(Debug, Clone, Copy)]
pub enum Seed<'a> {
    /// Raw 32 key or address bytes
    Key(&'a Pubkey),
    /// UTF-8 text
    Text(&'a str),
    /// Single byte (type tags)
    U8(u8),
    /// 8-byte little-endian timestamp
    I64(i64),
}

impl<'a> Seed<'a> {
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        match *self {
            Seed::Key(key) => Cow::Borrowed(key.as_ref()),
            Seed::Text(text) => Cow::Borrowed(text.as_bytes()),
            Seed::U8(value) => Cow::Owned(vec![value]),
            Seed::I64(value) => Cow::Owned(value.to_le_bytes().to_vec()),
        }
    }
}

/// A derived address together with its bump proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Derive the address for `tag` + `seeds` under `program_id`.
///
/// # Errors
///
/// - `InvalidSeed` if any seed is empty, there are too many seeds, or no bump
///   yields an off-curve address
/// - `SeedTooLong` if the combined seed bytes exceed [`MAX_SEED_PAYLOAD`]
pub fn derive(program_id: &Pubkey, tag: SeedTag, seeds: &[Seed<'_>]) -> Result<DerivedAddress> {
    let components = collect_components(tag, seeds)?;
    for bump in (0..=u8::MAX).rev() {
        let candidate = hash_components(&components, bump, program_id);
        if !is_on_curve(&candidate) {
            let address = Pubkey::new(candidate);
            tracing::trace!(tag = tag.as_str(), bump, address = %address.short(), "derived address");
            return Ok(DerivedAddress { address, bump });
        }
    }
    Err(TuneLedgerError::InvalidSeed(format!(
        "no off-curve address for {} seeds",
        tag.as_str()
    )))
}

/// Check that `derived` is the canonical derivation of `tag` + `seeds`.
pub fn verify(
    program_id: &Pubkey,
    tag: SeedTag,
    seeds: &[Seed<'_>],
    derived: &DerivedAddress,
) -> Result<bool> {
    let components = collect_components(tag, seeds)?;
    let candidate = hash_components(&components, derived.bump, program_id);
    if candidate != derived.address.to_bytes() || is_on_curve(&candidate) {
        return Ok(false);
    }
    // Canonical bump is the highest viable one; a lower bump is a different address.
    Ok(derive(program_id, tag, seeds)?.bump == derived.bump)
}

fn collect_components<'a>(tag: SeedTag, seeds: &[Seed<'a>]) -> Result<Vec<Cow<'a, [u8]>>> {
    if seeds.len() + 1 > MAX_SEEDS {
        return Err(TuneLedgerError::InvalidSeed(format!(
            "too many seeds ({} > {})",
            seeds.len() + 1,
            MAX_SEEDS
        )));
    }

    let mut components = Vec::with_capacity(seeds.len() + 1);
    components.push(Cow::Borrowed(tag.as_str().as_bytes()));
    for (index, seed) in seeds.iter().enumerate() {
        let bytes = seed.to_bytes();
        if bytes.is_empty() {
            return Err(TuneLedgerError::InvalidSeed(format!(
                "{} seed {} is empty",
                tag.as_str(),
                index
            )));
        }
        components.push(bytes);
    }

    let total: usize = components.iter().map(|c| c.len()).sum();
    if total > MAX_SEED_PAYLOAD {
        return Err(TuneLedgerError::SeedTooLong {
            len: total,
            max: MAX_SEED_PAYLOAD,
        });
    }
    Ok(components)
}

fn hash_components(components: &[Cow<'_, [u8]>], bump: u8, program_id: &Pubkey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for component in components {
        hasher.update((component.len() as u32).to_le_bytes());
        hasher.update(component);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Typed derivations for every record kind, bound to one program id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBook {
    program_id: Pubkey,
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM_ID)
    }
}

impl AddressBook {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn derive(&self, tag: SeedTag, seeds: &[Seed<'_>]) -> Result<Pubkey> {
        Ok(derive(&self.program_id, tag, seeds)?.address)
    }

    pub fn user_profile(&self, owner: &Pubkey) -> Result<Pubkey> {
        self.derive(SeedTag::UserProfile, &[Seed::Key(owner)])
    }

    pub fn user_stats(&self, owner: &Pubkey) -> Result<Pubkey> {
        self.derive(SeedTag::UserStats, &[Seed::Key(owner)])
    }

    pub fn track(&self, title: &str, artist: &str) -> Result<Pubkey> {
        self.derive(SeedTag::Track, &[Seed::Text(title), Seed::Text(artist)])
    }

    pub fn playlist(&self, owner: &Pubkey, name: &str) -> Result<Pubkey> {
        self.derive(SeedTag::Playlist, &[Seed::Key(owner), Seed::Text(name)])
    }

    pub fn playlist_track(&self, playlist: &Pubkey, track: &Pubkey) -> Result<Pubkey> {
        self.derive(SeedTag::PlaylistTrack, &[Seed::Key(playlist), Seed::Key(track)])
    }

    pub fn track_like(&self, user: &Pubkey, track: &Pubkey) -> Result<Pubkey> {
        self.derive(SeedTag::TrackLike, &[Seed::Key(user), Seed::Key(track)])
    }

    pub fn playlist_like(&self, user: &Pubkey, playlist: &Pubkey) -> Result<Pubkey> {
        self.derive(SeedTag::PlaylistLike, &[Seed::Key(user), Seed::Key(playlist)])
    }

    pub fn user_follow(&self, follower: &Pubkey, following_profile: &Pubkey) -> Result<Pubkey> {
        self.derive(
            SeedTag::UserFollow,
            &[Seed::Key(follower), Seed::Key(following_profile)],
        )
    }

    pub fn recommendation(
        &self,
        user: &Pubkey,
        target: &Pubkey,
        recommendation_type: u8,
    ) -> Result<Pubkey> {
        self.derive(
            SeedTag::Recommendation,
            &[
                Seed::Key(user),
                Seed::Key(target),
                Seed::U8(recommendation_type),
            ],
        )
    }

    /// Normalizes `search_term` before deriving, so "Rock" and "rock" share
    /// one index address.
    pub fn search_index(&self, search_term: &str, target_type: u8) -> Result<Pubkey> {
        let normalized = normalize_search_term(search_term);
        self.derive(
            SeedTag::SearchIndex,
            &[Seed::Text(&normalized), Seed::U8(target_type)],
        )
    }

    pub fn track_play(&self, track: &Pubkey, user: &Pubkey, played_at: i64) -> Result<Pubkey> {
        self.derive(
            SeedTag::TrackPlay,
            &[Seed::Key(track), Seed::Key(user), Seed::I64(played_at)],
        )
    }

    pub fn playlist_collaborator(&self, playlist: &Pubkey, collaborator: &Pubkey) -> Result<Pubkey> {
        self.derive(
            SeedTag::PlaylistCollaborator,
            &[Seed::Key(playlist), Seed::Key(collaborator)],
        )
    }

    pub fn activity_feed(&self, user: &Pubkey, timestamp: i64) -> Result<Pubkey> {
        self.derive(SeedTag::ActivityFeed, &[Seed::Key(user), Seed::I64(timestamp)])
    }

    pub fn user_insights(&self, user: &Pubkey) -> Result<Pubkey> {
        self.derive(SeedTag::UserInsights, &[Seed::Key(user)])
    }
}
