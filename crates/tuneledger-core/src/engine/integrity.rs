//! Counter/relationship consistency scan.
//!
//! Every stored counter must equal the number of relationship records that
//! point at its entity. A clean ledger yields no violations.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::address::AddressBook;
use crate::error::Result;
use crate::pubkey::Pubkey;
use crate::state::{
    Playlist, PlaylistLike, PlaylistTrack, Record, RecordKind, Track, TrackLike, TrackPlay,
    UserFollow, UserProfile,
};
use crate::store::RecordStore;

/// One counter that disagrees with its relationship records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub address: Pubkey,
    pub kind: &'static str,
    pub field: &'static str,
    /// Number of relationship records found
    pub expected: u64,
    /// Value stored in the counter
    pub actual: u64,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} is {}, but {} records exist",
            self.kind, self.address, self.field, self.actual, self.expected
        )
    }
}

fn scan<R: Record>(store: &dyn RecordStore) -> Result<Vec<(Pubkey, R)>> {
    store
        .scan(&R::KIND.discriminator())?
        .into_iter()
        .map(|(address, bytes)| Ok((address, R::unpack(&bytes)?)))
        .collect()
}

fn tally<I: IntoIterator<Item = Pubkey>>(targets: I) -> BTreeMap<Pubkey, u64> {
    let mut counts = BTreeMap::new();
    for target in targets {
        *counts.entry(target).or_default() += 1;
    }
    counts
}

struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn compare(
        &mut self,
        address: Pubkey,
        kind: RecordKind,
        field: &'static str,
        counts: &BTreeMap<Pubkey, u64>,
        actual: u64,
    ) {
        let expected = counts.get(&address).copied().unwrap_or(0);
        if expected != actual {
            let violation = Violation {
                address,
                kind: kind.name(),
                field,
                expected,
                actual,
            };
            warn!(%violation, "Integrity violation");
            self.violations.push(violation);
        }
    }
}

pub(crate) fn check(store: &dyn RecordStore, book: &AddressBook) -> Result<Vec<Violation>> {
    let likes = tally(scan::<TrackLike>(store)?.into_iter().map(|(_, r)| r.track));
    let plays = tally(scan::<TrackPlay>(store)?.into_iter().map(|(_, r)| r.track));
    let playlist_likes = tally(scan::<PlaylistLike>(store)?.into_iter().map(|(_, r)| r.playlist));
    let members = tally(scan::<PlaylistTrack>(store)?.into_iter().map(|(_, r)| r.playlist));

    let follows = scan::<UserFollow>(store)?;
    let followers = tally(follows.iter().map(|(_, r)| r.following));
    let mut following = BTreeMap::new();
    for (_, edge) in &follows {
        *following.entry(book.user_profile(&edge.follower)?).or_default() += 1;
    }

    let mut checker = Checker {
        violations: Vec::new(),
    };
    for (address, track) in scan::<Track>(store)? {
        checker.compare(address, RecordKind::Track, "likes_count", &likes, track.likes_count);
        checker.compare(address, RecordKind::Track, "plays_count", &plays, track.plays_count);
    }
    for (address, playlist) in scan::<Playlist>(store)? {
        checker.compare(
            address,
            RecordKind::Playlist,
            "likes_count",
            &playlist_likes,
            playlist.likes_count,
        );
        checker.compare(
            address,
            RecordKind::Playlist,
            "tracks_count",
            &members,
            playlist.tracks_count,
        );
    }
    for (address, profile) in scan::<UserProfile>(store)? {
        checker.compare(
            address,
            RecordKind::UserProfile,
            "followers_count",
            &followers,
            profile.followers_count,
        );
        checker.compare(
            address,
            RecordKind::UserProfile,
            "following_count",
            &following,
            profile.following_count,
        );
    }
    Ok(checker.violations)
}
