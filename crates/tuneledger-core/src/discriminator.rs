//! Schema discriminator table.
//!
//! Every record and instruction payload starts with an 8-byte discriminator.
//! Values follow the Anchor convention so payloads stay wire-compatible with
//! Anchor clients: records use `sha256("account:<RecordName>")[..8]`,
//! instructions use `sha256("global:<instruction_name>")[..8]`.
//!
//! The table is versioned by [`SCHEMA_VERSION`]. Duplicate entries fail
//! compilation.

use crate::codec::DISCRIMINATOR_BYTES;

/// Version of the record and instruction layouts below.
pub const SCHEMA_VERSION: u32 = 1;

pub type Discriminator = [u8; DISCRIMINATOR_BYTES];

pub mod record {
    use super::Discriminator;

    pub const USER_PROFILE: Discriminator = [32, 37, 119, 205, 179, 180, 13, 194];
    pub const USER_STATS: Discriminator = [176, 223, 136, 27, 122, 79, 32, 227];
    pub const TRACK: Discriminator = [148, 45, 9, 235, 14, 15, 36, 159];
    pub const TRACK_PLAY: Discriminator = [15, 130, 246, 158, 102, 41, 180, 55];
    pub const PLAYLIST: Discriminator = [132, 146, 3, 250, 182, 54, 96, 213];
    pub const PLAYLIST_TRACK: Discriminator = [211, 65, 115, 74, 165, 137, 83, 90];
    pub const PLAYLIST_COLLABORATOR: Discriminator = [242, 224, 159, 166, 91, 195, 228, 74];
    pub const TRACK_LIKE: Discriminator = [38, 82, 147, 22, 229, 244, 75, 204];
    pub const PLAYLIST_LIKE: Discriminator = [55, 196, 178, 117, 120, 175, 110, 122];
    pub const USER_FOLLOW: Discriminator = [180, 47, 223, 244, 165, 108, 59, 225];
    pub const ACTIVITY_FEED: Discriminator = [50, 28, 163, 196, 51, 222, 146, 101];
    pub const RECOMMENDATION: Discriminator = [78, 139, 82, 88, 180, 64, 114, 185];
    pub const SEARCH_INDEX: Discriminator = [34, 135, 109, 28, 105, 2, 24, 77];
    pub const USER_INSIGHTS: Discriminator = [202, 111, 169, 123, 25, 153, 131, 64];
}

pub mod instruction {
    use super::Discriminator;

    pub const CREATE_USER_PROFILE: Discriminator = [9, 214, 142, 184, 153, 65, 50, 174];
    pub const UPDATE_USER_PROFILE: Discriminator = [79, 75, 114, 130, 68, 123, 180, 11];
    pub const CREATE_TRACK: Discriminator = [29, 23, 82, 43, 136, 128, 152, 240];
    pub const PLAY_TRACK: Discriminator = [60, 166, 215, 96, 75, 235, 121, 30];
    pub const CREATE_PLAYLIST: Discriminator = [12, 221, 173, 119, 26, 182, 58, 49];
    pub const UPDATE_PLAYLIST: Discriminator = [99, 83, 228, 217, 23, 179, 64, 208];
    pub const ADD_TRACK_TO_PLAYLIST: Discriminator = [40, 122, 120, 88, 218, 58, 138, 92];
    pub const REMOVE_TRACK_FROM_PLAYLIST: Discriminator = [246, 227, 91, 80, 71, 221, 68, 3];
    pub const ADD_COLLABORATOR: Discriminator = [101, 50, 92, 92, 207, 109, 57, 25];
    pub const LIKE_TRACK: Discriminator = [95, 27, 245, 191, 55, 149, 235, 225];
    pub const UNLIKE_TRACK: Discriminator = [74, 158, 1, 169, 118, 71, 139, 45];
    pub const LIKE_PLAYLIST: Discriminator = [111, 58, 181, 69, 74, 29, 52, 1];
    pub const UNLIKE_PLAYLIST: Discriminator = [56, 229, 103, 56, 140, 202, 248, 4];
    pub const FOLLOW_USER: Discriminator = [126, 176, 97, 36, 63, 145, 4, 134];
    pub const UNFOLLOW_USER: Discriminator = [204, 183, 196, 110, 97, 165, 226, 213];
    pub const RECORD_ACTIVITY: Discriminator = [199, 86, 104, 65, 200, 211, 71, 50];
    pub const CREATE_SEARCH_INDEX: Discriminator = [245, 63, 114, 64, 166, 108, 115, 37];
    pub const GENERATE_USER_INSIGHTS: Discriminator = [146, 131, 2, 101, 248, 211, 218, 183];
    pub const CREATE_RECOMMENDATION: Discriminator = [182, 193, 48, 65, 186, 83, 23, 120];
    pub const MARK_RECOMMENDATION_VIEWED: Discriminator = [131, 28, 195, 97, 110, 207, 235, 210];
}

pub const RECORD_TABLE: [Discriminator; 14] = [
    record::USER_PROFILE,
    record::USER_STATS,
    record::TRACK,
    record::TRACK_PLAY,
    record::PLAYLIST,
    record::PLAYLIST_TRACK,
    record::PLAYLIST_COLLABORATOR,
    record::TRACK_LIKE,
    record::PLAYLIST_LIKE,
    record::USER_FOLLOW,
    record::ACTIVITY_FEED,
    record::RECOMMENDATION,
    record::SEARCH_INDEX,
    record::USER_INSIGHTS,
];

pub const INSTRUCTION_TABLE: [Discriminator; 20] = [
    instruction::CREATE_USER_PROFILE,
    instruction::UPDATE_USER_PROFILE,
    instruction::CREATE_TRACK,
    instruction::PLAY_TRACK,
    instruction::CREATE_PLAYLIST,
    instruction::UPDATE_PLAYLIST,
    instruction::ADD_TRACK_TO_PLAYLIST,
    instruction::REMOVE_TRACK_FROM_PLAYLIST,
    instruction::ADD_COLLABORATOR,
    instruction::LIKE_TRACK,
    instruction::UNLIKE_TRACK,
    instruction::LIKE_PLAYLIST,
    instruction::UNLIKE_PLAYLIST,
    instruction::FOLLOW_USER,
    instruction::UNFOLLOW_USER,
    instruction::RECORD_ACTIVITY,
    instruction::CREATE_SEARCH_INDEX,
    instruction::GENERATE_USER_INSIGHTS,
    instruction::CREATE_RECOMMENDATION,
    instruction::MARK_RECOMMENDATION_VIEWED,
];

const fn same(a: &Discriminator, b: &Discriminator) -> bool {
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn all_unique(table: &[Discriminator]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if same(&table[i], &table[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(all_unique(&RECORD_TABLE), "duplicate record discriminator");
const _: () = assert!(
    all_unique(&INSTRUCTION_TABLE),
    "duplicate instruction discriminator"
);

/// Anchor-style discriminator: first 8 bytes of `sha256("<namespace>:<name>")`.
pub fn anchor_discriminator(namespace: &str, name: &str) -> Discriminator {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut out = [0u8; DISCRIMINATOR_BYTES];
    out.copy_from_slice(&digest[..DISCRIMINATOR_BYTES]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::InstructionKind;
    use crate::state::RecordKind;

    #[test]
    fn test_record_table_matches_names() {
        for kind in RecordKind::ALL {
            assert_eq!(
                kind.discriminator(),
                anchor_discriminator("account", kind.name()),
                "record {}",
                kind.name()
            );
        }
    }

    #[test]
    fn test_instruction_table_matches_names() {
        for kind in InstructionKind::ALL {
            assert_eq!(
                kind.discriminator(),
                anchor_discriminator("global", kind.name()),
                "instruction {}",
                kind.name()
            );
        }
    }

    #[test]
    fn test_tables_do_not_overlap() {
        for record in RECORD_TABLE {
            assert!(!INSTRUCTION_TABLE.contains(&record));
        }
    }
}
