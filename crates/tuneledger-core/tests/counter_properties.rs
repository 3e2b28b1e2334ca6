use std::collections::BTreeSet;

use proptest::prelude::*;

use tuneledger_core::instruction::{CreateTrack, CreateUserProfile, Instruction};
use tuneledger_core::state::{Track, UserProfile, UserStats};
use tuneledger_core::{
    FixedClock, InstructionBuilder, Keypair, Ledger, MemoryStore, Pubkey, SignedInstruction,
    Signer, DEFAULT_PROGRAM_ID,
};

const USERS: u8 = 3;
const TRACKS: [&str; 2] = ["First", "Second"];

#[derive(Debug, Clone, Copy)]
enum Op {
    Like { user: u8, track: usize },
    Unlike { user: u8, track: usize },
    Follow { from: u8, to: u8 },
    Unfollow { from: u8, to: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS, 0..TRACKS.len()).prop_map(|(user, track)| Op::Like { user, track }),
        (0..USERS, 0..TRACKS.len()).prop_map(|(user, track)| Op::Unlike { user, track }),
        (0..USERS, 0..USERS).prop_map(|(from, to)| Op::Follow { from, to }),
        (0..USERS, 0..USERS).prop_map(|(from, to)| Op::Unfollow { from, to }),
    ]
}

struct World {
    ledger: Ledger<MemoryStore, FixedClock>,
    builder: InstructionBuilder,
    users: Vec<Keypair>,
    tracks: Vec<Pubkey>,
    // Tracks are created by user 0.
    creator: Pubkey,
}

impl World {
    fn new() -> Self {
        let mut ledger = Ledger::with_clock(
            MemoryStore::new(),
            DEFAULT_PROGRAM_ID,
            FixedClock::new(1_700_000_000),
        );
        let builder = InstructionBuilder::default();
        let users: Vec<Keypair> = (0..USERS).map(|i| Keypair::from_seed(&[i + 1; 32])).collect();

        for (i, user) in users.iter().enumerate() {
            let ix = builder
                .create_user_profile(&user.pubkey(), CreateUserProfile::new(format!("user{}", i)))
                .unwrap();
            ledger.process(&SignedInstruction::sign(ix, user).unwrap()).unwrap();
        }
        let creator = users[0].pubkey();
        let mut tracks = Vec::new();
        for title in TRACKS {
            let ix = builder
                .create_track(&creator, CreateTrack::new(title, "Artist", 200))
                .unwrap();
            ledger.process(&SignedInstruction::sign(ix, &users[0]).unwrap()).unwrap();
            tracks.push(builder.addresses().track(title, "Artist").unwrap());
        }

        Self {
            ledger,
            builder,
            users,
            tracks,
            creator,
        }
    }

    fn submit(&mut self, ix: Instruction, user: u8) -> bool {
        let tx = SignedInstruction::sign(ix, &self.users[user as usize]).unwrap();
        self.ledger.process(&tx).is_ok()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_counters_match_relationships(ops in prop::collection::vec(op(), 1..40)) {
        let mut world = World::new();
        let mut likes: BTreeSet<(u8, usize)> = BTreeSet::new();
        let mut follows: BTreeSet<(u8, u8)> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Like { user, track } => {
                    let key = world.users[user as usize].pubkey();
                    let ix = world.builder.like_track(&key, &world.tracks[track], &world.creator).unwrap();
                    let applied = world.submit(ix, user);
                    prop_assert_eq!(applied, likes.insert((user, track)));
                }
                Op::Unlike { user, track } => {
                    let key = world.users[user as usize].pubkey();
                    let ix = world.builder.unlike_track(&key, &world.tracks[track], &world.creator).unwrap();
                    let applied = world.submit(ix, user);
                    prop_assert_eq!(applied, likes.remove(&(user, track)));
                }
                Op::Follow { from, to } => {
                    let follower = world.users[from as usize].pubkey();
                    let following = world.users[to as usize].pubkey();
                    match world.builder.follow_user(&follower, &following) {
                        Ok(ix) => {
                            let applied = world.submit(ix, from);
                            prop_assert_eq!(applied, follows.insert((from, to)));
                        }
                        Err(_) => {
                            prop_assert_eq!(from, to);
                        }
                    }
                }
                Op::Unfollow { from, to } => {
                    let follower = world.users[from as usize].pubkey();
                    let following = world.users[to as usize].pubkey();
                    match world.builder.unfollow_user(&follower, &following) {
                        Ok(ix) => {
                            let applied = world.submit(ix, from);
                            prop_assert_eq!(applied, follows.remove(&(from, to)));
                        }
                        Err(_) => {
                            prop_assert_eq!(from, to);
                        }
                    }
                }
            }
        }

        let book = *world.ledger.addresses();
        for (index, address) in world.tracks.iter().enumerate() {
            let track: Track = world.ledger.fetch(address).unwrap().unwrap();
            let expected = likes.iter().filter(|(_, t)| *t == index).count() as u64;
            prop_assert_eq!(track.likes_count, expected);
        }
        let stats: UserStats = world.ledger.fetch(&book.user_stats(&world.creator).unwrap()).unwrap().unwrap();
        prop_assert_eq!(stats.total_likes_received, likes.len() as u64);

        for (index, user) in world.users.iter().enumerate() {
            let index = index as u8;
            let profile: UserProfile = world
                .ledger
                .fetch(&book.user_profile(&user.pubkey()).unwrap())
                .unwrap()
                .unwrap();
            let following = follows.iter().filter(|(from, _)| *from == index).count() as u64;
            let followers = follows.iter().filter(|(_, to)| *to == index).count() as u64;
            prop_assert_eq!(profile.following_count, following);
            prop_assert_eq!(profile.followers_count, followers);
        }

        let violations = world.ledger.check_integrity().unwrap();
        prop_assert!(violations.is_empty(), "violations: {:?}", violations);
    }
}
