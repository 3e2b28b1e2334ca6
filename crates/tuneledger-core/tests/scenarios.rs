use std::sync::Arc;

use tuneledger_core::client::{Confirmation, LocalTransport, Transport};
use tuneledger_core::instruction::{
    AccountMeta, AddCollaborator, CreatePlaylist, CreateRecommendation, CreateSearchIndex,
    CreateTrack, CreateUserProfile, Instruction, InstructionBuilder, ProtocolInstruction,
    RecordActivity, UpdatePlaylist, UpdateUserProfile,
};
use tuneledger_core::state::{
    ActivityFeed, ActivityType, Playlist, PlaylistTrack, Recommendation, Record, SearchIndex,
    TargetType, Track, TrackPlay, UserInsights, UserProfile, UserStats, PERMISSION_ADD_TRACKS,
    PERMISSION_EDIT_INFO,
};
use tuneledger_core::{
    FixedClock, Keypair, Ledger, MemoryStore, Pubkey, RecordStore, SignedInstruction, Signer,
    TuneLedgerError, DEFAULT_PROGRAM_ID,
};

const START: i64 = 1_700_000_000;

struct Network {
    transport: LocalTransport<MemoryStore, Arc<FixedClock>>,
    clock: Arc<FixedClock>,
    builder: InstructionBuilder,
}

impl Network {
    fn new() -> Self {
        let clock = Arc::new(FixedClock::new(START));
        let ledger = Ledger::with_clock(MemoryStore::new(), DEFAULT_PROGRAM_ID, clock.clone());
        Self {
            transport: LocalTransport::new(ledger),
            clock,
            builder: InstructionBuilder::default(),
        }
    }

    fn send(&mut self, ix: Instruction, signer: &Keypair) -> Result<Confirmation, TuneLedgerError> {
        self.clock.advance(1);
        let tx = SignedInstruction::sign(ix, signer)?;
        self.transport.submit(&tx)
    }

    /// Submit and unwrap the engine error behind a rejection.
    fn reject(&mut self, ix: Instruction, signer: &Keypair) -> TuneLedgerError {
        match self.send(ix, signer) {
            Ok(confirmation) => panic!("expected rejection, got {:?}", confirmation),
            Err(TuneLedgerError::Rejected(inner)) => *inner,
            Err(other) => panic!("expected a rejection, got {:?}", other),
        }
    }

    fn fetch<R: Record>(&self, address: &Pubkey) -> R {
        let bytes = self
            .transport
            .read(address)
            .expect("read should succeed")
            .expect("record should exist");
        R::unpack(&bytes).expect("record should decode")
    }

    fn exists(&self, address: &Pubkey) -> bool {
        self.transport.read(address).expect("read should succeed").is_some()
    }

    fn profile(&mut self, user: &Keypair, username: &str) -> Pubkey {
        let ix = self
            .builder
            .create_user_profile(&user.pubkey(), CreateUserProfile::new(username))
            .unwrap();
        self.send(ix, user).expect("create profile");
        self.builder.addresses().user_profile(&user.pubkey()).unwrap()
    }

    fn track(&mut self, creator: &Keypair, title: &str, genre: &str) -> Pubkey {
        let args = CreateTrack::new(title, "Test Artist", 180).with_genre(genre);
        let ix = self.builder.create_track(&creator.pubkey(), args).unwrap();
        self.send(ix, creator).expect("create track");
        self.builder.addresses().track(title, "Test Artist").unwrap()
    }

    fn playlist(&mut self, owner: &Keypair, args: CreatePlaylist) -> Pubkey {
        let name = args.name.clone();
        let ix = self.builder.create_playlist(&owner.pubkey(), args).unwrap();
        self.send(ix, owner).expect("create playlist");
        self.builder.addresses().playlist(&owner.pubkey(), &name).unwrap()
    }

    fn stats(&self, user: &Keypair) -> UserStats {
        self.fetch(&self.builder.addresses().user_stats(&user.pubkey()).unwrap())
    }

    fn check_clean(&self) {
        let violations = self.transport.ledger().check_integrity().unwrap();
        assert!(violations.is_empty(), "violations: {:?}", violations);
    }
}

fn keypair(seed: u8) -> Keypair {
    Keypair::from_seed(&[seed; 32])
}

#[test]
fn test_profile_creation_is_rejected_the_second_time() {
    let mut net = Network::new();
    let user = keypair(1);
    let address = net.profile(&user, "testuser");

    let profile: UserProfile = net.fetch(&address);
    assert_eq!(profile.username, "testuser");
    assert_eq!(profile.authority, user.pubkey());
    assert_eq!(profile.followers_count, 0);
    assert_eq!(profile.following_count, 0);
    assert!(profile.created_at > 0);

    let again = net
        .builder
        .create_user_profile(&user.pubkey(), CreateUserProfile::new("testuser"))
        .unwrap();
    assert!(matches!(
        net.reject(again, &user),
        TuneLedgerError::AlreadyInitialized(_)
    ));
}

#[test]
fn test_profile_update_keeps_absent_fields() {
    let mut net = Network::new();
    let user = keypair(1);
    let create = CreateUserProfile::new("testuser").with_bio("old bio");
    let ix = net.builder.create_user_profile(&user.pubkey(), create).unwrap();
    net.send(ix, &user).unwrap();

    let update = UpdateUserProfile {
        display_name: Some("Test User".to_string()),
        bio: None,
        profile_image: Some(String::new()),
    };
    let ix = net.builder.update_user_profile(&user.pubkey(), update).unwrap();
    net.send(ix, &user).unwrap();

    let profile: UserProfile = net.fetch(&net.builder.addresses().user_profile(&user.pubkey()).unwrap());
    assert_eq!(profile.display_name, "Test User");
    assert_eq!(profile.bio, "old bio");
    assert_eq!(profile.profile_image, "");
}

#[test]
fn test_updating_another_users_profile_is_unauthorized() {
    let mut net = Network::new();
    let owner = keypair(1);
    let intruder = keypair(2);
    let target = net.profile(&owner, "owner");
    net.profile(&intruder, "intruder");

    let book = *net.builder.addresses();
    let ix = Instruction {
        program_id: DEFAULT_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(target),
            AccountMeta::writable(book.user_stats(&intruder.pubkey()).unwrap()),
            AccountMeta::signer(intruder.pubkey(), false),
        ],
        data: tuneledger_core::instruction::ProtocolInstruction::UpdateUserProfile(
            UpdateUserProfile {
                display_name: Some("pwned".to_string()),
                ..Default::default()
            },
        )
        .encode(),
    };
    assert!(matches!(
        net.reject(ix, &intruder),
        TuneLedgerError::Unauthorized(_)
    ));
    let profile: UserProfile = net.fetch(&target);
    assert_eq!(profile.display_name, "");
}

#[test]
fn test_track_like_unlike_cycle() {
    let mut net = Network::new();
    let creator = keypair(1);
    let fan = keypair(2);
    let track = net.track(&creator, "Test Song", "Rock");

    let created: Track = net.fetch(&track);
    assert_eq!(created.likes_count, 0);
    assert_eq!(created.plays_count, 0);
    assert_eq!(net.stats(&creator).tracks_created, 1);

    let like = net.builder.like_track(&fan.pubkey(), &track, &creator.pubkey()).unwrap();
    net.send(like.clone(), &fan).unwrap();
    assert_eq!(net.fetch::<Track>(&track).likes_count, 1);
    assert_eq!(net.stats(&creator).total_likes_received, 1);
    assert!(matches!(net.reject(like.clone(), &fan), TuneLedgerError::AlreadyExists(_)));

    let unlike = net.builder.unlike_track(&fan.pubkey(), &track, &creator.pubkey()).unwrap();
    net.send(unlike.clone(), &fan).unwrap();
    assert_eq!(net.fetch::<Track>(&track).likes_count, 0);
    assert_eq!(net.stats(&creator).total_likes_received, 0);
    assert!(!net.exists(&net.builder.addresses().track_like(&fan.pubkey(), &track).unwrap()));
    assert!(matches!(net.reject(unlike, &fan), TuneLedgerError::NotFound(_)));

    // A closed like can be recreated.
    net.send(like, &fan).unwrap();
    assert_eq!(net.fetch::<Track>(&track).likes_count, 1);
    net.check_clean();
}

#[test]
fn test_plays_count_towards_track_and_creator() {
    let mut net = Network::new();
    let creator = keypair(1);
    let listener = keypair(2);
    let track = net.track(&creator, "Test Song", "Rock");

    for played_at in [START + 100, START + 200] {
        let ix = net
            .builder
            .play_track(&listener.pubkey(), &track, &creator.pubkey(), 120, played_at)
            .unwrap();
        net.send(ix, &listener).unwrap();
    }
    assert_eq!(net.fetch::<Track>(&track).plays_count, 2);
    assert_eq!(net.stats(&creator).total_plays, 2);

    let play_address = net
        .builder
        .addresses()
        .track_play(&track, &listener.pubkey(), START + 100)
        .unwrap();
    let play: TrackPlay = net.fetch(&play_address);
    assert_eq!(play.created_at, START + 100);
    assert_eq!(play.duration_played, 120);

    let replay = net
        .builder
        .play_track(&listener.pubkey(), &track, &creator.pubkey(), 120, START + 100)
        .unwrap();
    assert!(matches!(
        net.reject(replay, &listener),
        TuneLedgerError::AlreadyInitialized(_)
    ));
    net.check_clean();
}

#[test]
fn test_playlist_positions_are_not_renumbered() {
    let mut net = Network::new();
    let owner = keypair(1);
    let first = net.track(&owner, "First", "Rock");
    let second = net.track(&owner, "Second", "Rock");
    let playlist = net.playlist(&owner, CreatePlaylist::new("Road Trip"));
    assert_eq!(net.stats(&owner).playlists_created, 1);

    for track in [first, second] {
        let ix = net
            .builder
            .add_track_to_playlist(&owner.pubkey(), &playlist, &track)
            .unwrap();
        net.send(ix, &owner).unwrap();
    }
    let book = *net.builder.addresses();
    let first_member: PlaylistTrack = net.fetch(&book.playlist_track(&playlist, &first).unwrap());
    let second_member: PlaylistTrack = net.fetch(&book.playlist_track(&playlist, &second).unwrap());
    assert_eq!(first_member.position, 0);
    assert_eq!(second_member.position, 1);
    assert_eq!(net.fetch::<Playlist>(&playlist).tracks_count, 2);

    let remove = net
        .builder
        .remove_track_from_playlist(&owner.pubkey(), &playlist, &first)
        .unwrap();
    net.send(remove.clone(), &owner).unwrap();
    assert_eq!(net.fetch::<Playlist>(&playlist).tracks_count, 1);
    let second_member: PlaylistTrack = net.fetch(&book.playlist_track(&playlist, &second).unwrap());
    assert_eq!(second_member.position, 1);
    assert!(matches!(net.reject(remove, &owner), TuneLedgerError::NotFound(_)));

    let duplicate = net
        .builder
        .add_track_to_playlist(&owner.pubkey(), &playlist, &second)
        .unwrap();
    assert!(matches!(net.reject(duplicate, &owner), TuneLedgerError::AlreadyExists(_)));

    // The next add takes the current count, which the second track already holds.
    let third = net.track(&owner, "Third", "Rock");
    let ix = net
        .builder
        .add_track_to_playlist(&owner.pubkey(), &playlist, &third)
        .unwrap();
    net.send(ix, &owner).unwrap();
    let third_member: PlaylistTrack = net.fetch(&book.playlist_track(&playlist, &third).unwrap());
    assert_eq!(third_member.position, 1);
    assert_eq!(third_member.position, second_member.position);
    assert_eq!(net.fetch::<Playlist>(&playlist).tracks_count, 2);
    net.check_clean();
}

#[test]
fn test_collaborator_permissions() {
    let mut net = Network::new();
    let owner = keypair(1);
    let helper = keypair(2);
    let stranger = keypair(3);
    let track = net.track(&owner, "Shared", "Jazz");
    let other = net.track(&owner, "Other", "Jazz");
    let playlist = net.playlist(&owner, CreatePlaylist::new("Team Mix"));

    let stranger_add = net
        .builder
        .add_track_to_playlist(&stranger.pubkey(), &playlist, &track)
        .unwrap();
    assert!(matches!(
        net.reject(stranger_add.clone(), &stranger),
        TuneLedgerError::Unauthorized(_)
    ));

    let invite = net
        .builder
        .add_collaborator(&owner.pubkey(), &playlist, &helper.pubkey(), PERMISSION_ADD_TRACKS)
        .unwrap();
    net.send(invite.clone(), &owner).unwrap();
    assert!(matches!(net.reject(invite, &owner), TuneLedgerError::AlreadyExists(_)));

    let helper_add = net
        .builder
        .add_track_to_playlist(&helper.pubkey(), &playlist, &track)
        .unwrap();
    net.send(helper_add, &helper).unwrap();
    let member: PlaylistTrack = net.fetch(
        &net.builder.addresses().playlist_track(&playlist, &track).unwrap(),
    );
    assert_eq!(member.added_by, helper.pubkey());

    let helper_remove = net
        .builder
        .remove_track_from_playlist(&helper.pubkey(), &playlist, &track)
        .unwrap();
    assert!(matches!(
        net.reject(helper_remove, &helper),
        TuneLedgerError::Unauthorized(_)
    ));

    let helper_edit = net
        .builder
        .update_playlist(
            &helper.pubkey(),
            &playlist,
            UpdatePlaylist {
                description: Some("ours now".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(matches!(net.reject(helper_edit, &helper), TuneLedgerError::Unauthorized(_)));

    // Opening the playlist lets anyone add.
    let open_up = net
        .builder
        .update_playlist(
            &owner.pubkey(),
            &playlist,
            UpdatePlaylist {
                is_collaborative: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    net.send(open_up, &owner).unwrap();
    let stranger_add = net
        .builder
        .add_track_to_playlist(&stranger.pubkey(), &playlist, &other)
        .unwrap();
    net.send(stranger_add, &stranger).unwrap();
    assert_eq!(net.fetch::<Playlist>(&playlist).tracks_count, 2);
    net.check_clean();
}

#[test]
fn test_editor_collaborator_can_update_playlist() {
    let mut net = Network::new();
    let owner = keypair(1);
    let editor = keypair(2);
    let playlist = net.playlist(&owner, CreatePlaylist::new("Chill").with_description("before"));

    let invite = net
        .builder
        .add_collaborator(&owner.pubkey(), &playlist, &editor.pubkey(), PERMISSION_EDIT_INFO)
        .unwrap();
    net.send(invite, &owner).unwrap();

    let edit = net
        .builder
        .update_playlist(
            &editor.pubkey(),
            &playlist,
            UpdatePlaylist {
                description: Some("after".to_string()),
                is_public: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    net.send(edit, &editor).unwrap();

    let updated: Playlist = net.fetch(&playlist);
    assert_eq!(updated.description, "after");
    assert!(!updated.is_public);
    assert!(updated.updated_at > updated.created_at);
}

#[test]
fn test_playlist_likes_credit_the_owner() {
    let mut net = Network::new();
    let owner = keypair(1);
    let fan = keypair(2);
    let playlist = net.playlist(&owner, CreatePlaylist::new("Favorites"));

    let like = net
        .builder
        .like_playlist(&fan.pubkey(), &playlist, &owner.pubkey())
        .unwrap();
    net.send(like, &fan).unwrap();
    assert_eq!(net.fetch::<Playlist>(&playlist).likes_count, 1);
    assert_eq!(net.stats(&owner).total_likes_received, 1);

    let unlike = net
        .builder
        .unlike_playlist(&fan.pubkey(), &playlist, &owner.pubkey())
        .unwrap();
    net.send(unlike.clone(), &fan).unwrap();
    assert_eq!(net.fetch::<Playlist>(&playlist).likes_count, 0);
    assert!(matches!(net.reject(unlike, &fan), TuneLedgerError::NotFound(_)));
    net.check_clean();
}

#[test]
fn test_follow_unfollow_cycle() {
    let mut net = Network::new();
    let alice = keypair(1);
    let bob = keypair(2);
    let alice_profile = net.profile(&alice, "alice");
    let bob_profile = net.profile(&bob, "bob");

    let follow = net.builder.follow_user(&alice.pubkey(), &bob.pubkey()).unwrap();
    net.send(follow.clone(), &alice).unwrap();
    assert_eq!(net.fetch::<UserProfile>(&alice_profile).following_count, 1);
    assert_eq!(net.fetch::<UserProfile>(&bob_profile).followers_count, 1);
    assert!(matches!(net.reject(follow, &alice), TuneLedgerError::AlreadyExists(_)));

    let unfollow = net.builder.unfollow_user(&alice.pubkey(), &bob.pubkey()).unwrap();
    net.send(unfollow.clone(), &alice).unwrap();
    assert_eq!(net.fetch::<UserProfile>(&alice_profile).following_count, 0);
    assert_eq!(net.fetch::<UserProfile>(&bob_profile).followers_count, 0);
    assert!(matches!(net.reject(unfollow, &alice), TuneLedgerError::NotFound(_)));
    net.check_clean();
}

#[test]
fn test_follow_requires_both_profiles() {
    let mut net = Network::new();
    let alice = keypair(1);
    let bob = keypair(2);
    net.profile(&bob, "bob");

    let follow = net.builder.follow_user(&alice.pubkey(), &bob.pubkey()).unwrap();
    assert!(matches!(net.reject(follow, &alice), TuneLedgerError::NotFound(_)));
}

#[test]
fn test_self_follow_is_a_validation_error() {
    let net = Network::new();
    let alice = keypair(1);
    let result = net.builder.follow_user(&alice.pubkey(), &alice.pubkey());
    assert!(matches!(result, Err(TuneLedgerError::Validation(_))));
}

#[test]
fn test_activity_feed_uses_client_timestamp() {
    let mut net = Network::new();
    let user = keypair(1);
    let target = Pubkey::new([7; 32]);
    let args = RecordActivity {
        activity_type: ActivityType::TrackLiked.as_u8(),
        target,
        metadata: "liked Test Song".to_string(),
        timestamp: START - 50,
    };
    let ix = net.builder.record_activity(&user.pubkey(), args).unwrap();
    net.send(ix, &user).unwrap();

    let address = net
        .builder
        .addresses()
        .activity_feed(&user.pubkey(), START - 50)
        .unwrap();
    let activity: ActivityFeed = net.fetch(&address);
    assert_eq!(activity.created_at, START - 50);
    assert_eq!(activity.target, target);
}

#[test]
fn test_search_terms_are_normalized() {
    let mut net = Network::new();
    let user = keypair(1);
    let target = Pubkey::new([7; 32]);
    let index = |term: &str| CreateSearchIndex {
        search_term: term.to_string(),
        target_type: TargetType::Track.as_u8(),
        target,
    };

    let ix = net.builder.create_search_index(&user.pubkey(), index("  Rock ")).unwrap();
    net.send(ix, &user).unwrap();
    let address = net
        .builder
        .addresses()
        .search_index("rock", TargetType::Track.as_u8())
        .unwrap();
    let entry: SearchIndex = net.fetch(&address);
    assert_eq!(entry.search_term, "rock");
    assert_eq!(entry.target_pubkey, target);

    let again = net.builder.create_search_index(&user.pubkey(), index("ROCK")).unwrap();
    assert!(matches!(
        net.reject(again, &user),
        TuneLedgerError::AlreadyInitialized(_)
    ));
}

#[test]
fn test_recommendation_viewing() {
    let mut net = Network::new();
    let user = keypair(1);
    let other = keypair(2);
    let target = Pubkey::new([7; 32]);
    let kind = TargetType::Track.as_u8();

    let args = CreateRecommendation {
        recommendation_type: kind,
        target,
        score: 0.8,
        reason: "similar taste".to_string(),
    };
    let ix = net.builder.create_recommendation(&user.pubkey(), args).unwrap();
    net.send(ix, &user).unwrap();
    let address = net
        .builder
        .addresses()
        .recommendation(&user.pubkey(), &target, kind)
        .unwrap();
    assert!(!net.fetch::<Recommendation>(&address).is_viewed);

    let hijack = Instruction {
        program_id: DEFAULT_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(address),
            AccountMeta::signer(other.pubkey(), false),
        ],
        data: tuneledger_core::instruction::ProtocolInstruction::MarkRecommendationViewed
            .encode(),
    };
    assert!(matches!(net.reject(hijack, &other), TuneLedgerError::Unauthorized(_)));

    let view = net
        .builder
        .mark_recommendation_viewed(&user.pubkey(), &target, kind)
        .unwrap();
    net.send(view, &user).unwrap();
    assert!(net.fetch::<Recommendation>(&address).is_viewed);
}

#[test]
fn test_user_insights_fold_plays() {
    let mut net = Network::new();
    let creator = keypair(1);
    let listener = keypair(2);
    let stranger = keypair(3);
    net.profile(&creator, "creator");
    net.profile(&listener, "listener");
    let rock = net.track(&creator, "Anthem", "Rock");
    let jazz = net.track(&creator, "Blue", "Jazz");

    let follow = net.builder.follow_user(&listener.pubkey(), &creator.pubkey()).unwrap();
    net.send(follow, &listener).unwrap();

    let book = *net.builder.addresses();
    let mut plays = Vec::new();
    for (track, played_at, seconds) in [
        (rock, START + 10, 100),
        (rock, START + 20, 200),
        (jazz, START + 30, 60),
    ] {
        let ix = net
            .builder
            .play_track(&listener.pubkey(), &track, &creator.pubkey(), seconds, played_at)
            .unwrap();
        net.send(ix, &listener).unwrap();
        plays.push(book.track_play(&track, &listener.pubkey(), played_at).unwrap());
    }

    let ix = net
        .builder
        .generate_user_insights(&listener.pubkey(), &plays, &[rock, jazz])
        .unwrap();
    net.send(ix, &listener).unwrap();

    let insights: UserInsights = net.fetch(&book.user_insights(&listener.pubkey()).unwrap());
    assert_eq!(insights.user, listener.pubkey());
    assert_eq!(insights.total_listening_time, 360);
    assert_eq!(insights.most_played_track, Some(rock));
    assert_eq!(insights.favorite_genre, "Rock");
    assert!((insights.discovery_score - 2.0 / 3.0).abs() < 1e-6);
    assert!((insights.social_engagement - 0.01).abs() < 1e-6);

    // Someone else's play cannot be folded into the listener's insights.
    let ix = net
        .builder
        .play_track(&stranger.pubkey(), &jazz, &creator.pubkey(), 30, START + 40)
        .unwrap();
    net.send(ix, &stranger).unwrap();
    let foreign = book.track_play(&jazz, &stranger.pubkey(), START + 40).unwrap();
    let ix = net
        .builder
        .generate_user_insights(&listener.pubkey(), &[foreign], &[])
        .unwrap();
    assert!(matches!(net.reject(ix, &listener), TuneLedgerError::InvalidAccount(_)));
    net.check_clean();
}

#[test]
fn test_insights_without_plays() {
    let mut net = Network::new();
    let user = keypair(1);
    net.profile(&user, "quiet");

    let ix = net.builder.generate_user_insights(&user.pubkey(), &[], &[]).unwrap();
    net.send(ix, &user).unwrap();

    let insights: UserInsights = net.fetch(
        &net.builder.addresses().user_insights(&user.pubkey()).unwrap(),
    );
    assert_eq!(insights.total_listening_time, 0);
    assert_eq!(insights.most_played_track, None);
    assert_eq!(insights.favorite_genre, "Unknown");
    assert_eq!(insights.discovery_score, 0.0);
}

#[test]
fn test_tampered_signature_is_rejected() {
    let mut net = Network::new();
    let user = keypair(1);
    let ix = net
        .builder
        .create_user_profile(&user.pubkey(), CreateUserProfile::new("testuser"))
        .unwrap();
    let mut tx = SignedInstruction::sign(ix, &user).unwrap();
    tx.instruction.data.push(0);

    let err = net.transport.submit(&tx).unwrap_err();
    assert!(matches!(err.root_cause(), TuneLedgerError::InvalidSignature));
    assert!(!net.exists(&net.builder.addresses().user_profile(&user.pubkey()).unwrap()));
}

/// An instruction assembled by hand, skipping the builder's checks.
fn raw(accounts: Vec<AccountMeta>, payload: &ProtocolInstruction) -> Instruction {
    Instruction {
        program_id: DEFAULT_PROGRAM_ID,
        accounts,
        data: payload.encode(),
    }
}

fn validation_message(result: Result<Instruction, TuneLedgerError>) -> String {
    match result {
        Err(TuneLedgerError::Validation(message)) => message,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_engine_rejects_what_the_builder_rejects() {
    let mut net = Network::new();
    let user = keypair(1);
    let me = user.pubkey();
    let other = keypair(2).pubkey();
    let target = Pubkey::new([7; 32]);
    let playlist = Pubkey::new([8; 32]);

    let recommendation = |score: f32| CreateRecommendation {
        recommendation_type: TargetType::Track.as_u8(),
        target,
        score,
        reason: String::new(),
    };
    let activity = |timestamp: i64| RecordActivity {
        activity_type: ActivityType::TrackLiked.as_u8(),
        target,
        metadata: String::new(),
        timestamp,
    };
    let blank_term = CreateSearchIndex {
        search_term: "   ".to_string(),
        target_type: TargetType::Track.as_u8(),
        target,
    };
    let zero_duration = CreateTrack::new("Test Song", "Test Artist", 0);

    let builder = &net.builder;
    let cases: Vec<(ProtocolInstruction, Result<Instruction, TuneLedgerError>)> = vec![
        (
            ProtocolInstruction::CreateUserProfile(CreateUserProfile::new("")),
            builder.create_user_profile(&me, CreateUserProfile::new("")),
        ),
        (
            ProtocolInstruction::CreateTrack(zero_duration.clone()),
            builder.create_track(&me, zero_duration),
        ),
        (
            ProtocolInstruction::CreateRecommendation(recommendation(1.5)),
            builder.create_recommendation(&me, recommendation(1.5)),
        ),
        (
            ProtocolInstruction::CreateRecommendation(recommendation(f32::NAN)),
            builder.create_recommendation(&me, recommendation(f32::NAN)),
        ),
        (
            ProtocolInstruction::CreateSearchIndex(blank_term.clone()),
            builder.create_search_index(&me, blank_term),
        ),
        (
            ProtocolInstruction::AddCollaborator(AddCollaborator { permissions: 0 }),
            builder.add_collaborator(&me, &playlist, &other, 0),
        ),
        (
            ProtocolInstruction::AddCollaborator(AddCollaborator { permissions: 8 }),
            builder.add_collaborator(&me, &playlist, &other, 8),
        ),
        (
            ProtocolInstruction::RecordActivity(activity(0)),
            builder.record_activity(&me, activity(0)),
        ),
        (
            ProtocolInstruction::RecordActivity(activity(-5)),
            builder.record_activity(&me, activity(-5)),
        ),
    ];

    for (payload, built) in cases {
        let expected = validation_message(built);
        let ix = raw(vec![AccountMeta::signer(me, true)], &payload);
        match net.reject(ix, &user) {
            TuneLedgerError::Validation(message) => {
                assert_eq!(message, expected, "{}", payload.kind().name())
            }
            other => panic!("{}: expected validation, got {:?}", payload.kind().name(), other),
        }
    }
    assert_eq!(net.transport.ledger().store().len().unwrap(), 0);
}

#[test]
fn test_engine_rejects_self_relationships_like_the_builder() {
    let mut net = Network::new();
    let alice = keypair(1);
    let me = alice.pubkey();
    let profile = net.profile(&alice, "alice");

    let book = *net.builder.addresses();
    let edge = book.user_follow(&me, &profile).unwrap();
    let playlist = book.playlist(&me, "Road Trip").unwrap();
    let membership = book.playlist_collaborator(&playlist, &me).unwrap();

    let follow_message = validation_message(net.builder.follow_user(&me, &me));
    let follow = raw(
        vec![
            AccountMeta::writable(profile),
            AccountMeta::writable(profile),
            AccountMeta::writable(edge),
            AccountMeta::signer(me, true),
        ],
        &ProtocolInstruction::FollowUser,
    );
    match net.reject(follow, &alice) {
        TuneLedgerError::Validation(message) => assert_eq!(message, follow_message),
        other => panic!("expected validation, got {:?}", other),
    }

    let collaborate_message = validation_message(net.builder.add_collaborator(
        &me,
        &playlist,
        &me,
        PERMISSION_ADD_TRACKS,
    ));
    let collaborate = raw(
        vec![
            AccountMeta::readonly(playlist),
            AccountMeta::writable(membership),
            AccountMeta::readonly(me),
            AccountMeta::signer(me, true),
        ],
        &ProtocolInstruction::AddCollaborator(AddCollaborator {
            permissions: PERMISSION_ADD_TRACKS,
        }),
    );
    match net.reject(collaborate, &alice) {
        TuneLedgerError::Validation(message) => assert_eq!(message, collaborate_message),
        other => panic!("expected validation, got {:?}", other),
    }

    assert!(!net.exists(&edge));
    assert_eq!(net.fetch::<UserProfile>(&profile).following_count, 0);
}
