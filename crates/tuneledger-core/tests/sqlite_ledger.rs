use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tuneledger_core::instruction::{CreatePlaylist, CreateTrack, CreateUserProfile};
use tuneledger_core::state::{Playlist, Track, UserProfile};
use tuneledger_core::{
    FixedClock, InstructionBuilder, Keypair, Ledger, Pubkey, RecordStore, SignedInstruction,
    Signer, SqliteStore, TuneLedgerError, DEFAULT_PROGRAM_ID,
};

const NOW: i64 = 1_700_000_000;

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be available")
            .as_nanos();
        let filename = format!("{}_{}_{}.tuneledger", prefix, std::process::id(), nanos);
        let path = std::env::temp_dir().join(filename);
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn ledger(store: SqliteStore) -> Ledger<SqliteStore, FixedClock> {
    Ledger::with_clock(store, DEFAULT_PROGRAM_ID, FixedClock::new(NOW))
}

#[test]
fn test_records_survive_reopen() {
    let temp = TempFile::new("tuneledger_reopen");
    let user = Keypair::from_seed(&[1; 32]);
    let builder = InstructionBuilder::default();

    {
        let store = SqliteStore::create(&temp.path, &DEFAULT_PROGRAM_ID)
            .expect("create should succeed");
        let mut ledger = ledger(store);
        for ix in [
            builder
                .create_user_profile(&user.pubkey(), CreateUserProfile::new("testuser"))
                .unwrap(),
            builder
                .create_track(&user.pubkey(), CreateTrack::new("Test Song", "Test Artist", 180))
                .unwrap(),
            builder
                .create_playlist(&user.pubkey(), CreatePlaylist::new("Road Trip"))
                .unwrap(),
        ] {
            let tx = SignedInstruction::sign(ix, &user).unwrap();
            ledger.process(&tx).expect("instruction should apply");
        }
    }

    let store = SqliteStore::open(&temp.path, &DEFAULT_PROGRAM_ID).expect("open should succeed");
    assert_eq!(store.sequence().unwrap(), 3);
    let metadata = store.metadata().unwrap();
    assert_eq!(metadata.sequence, 3);
    assert_eq!(metadata.program_id, DEFAULT_PROGRAM_ID);
    // profile, stats, track, playlist
    assert_eq!(metadata.record_count, 4);

    let mut ledger = ledger(store);
    let book = *ledger.addresses();
    let profile: UserProfile = ledger
        .fetch(&book.user_profile(&user.pubkey()).unwrap())
        .unwrap()
        .expect("profile should persist");
    assert_eq!(profile.username, "testuser");
    let track: Track = ledger
        .fetch(&book.track("Test Song", "Test Artist").unwrap())
        .unwrap()
        .expect("track should persist");
    assert_eq!(track.created_by, user.pubkey());

    let playlist_address = book.playlist(&user.pubkey(), "Road Trip").unwrap();
    let track_address = book.track("Test Song", "Test Artist").unwrap();
    let ix = builder
        .add_track_to_playlist(&user.pubkey(), &playlist_address, &track_address)
        .unwrap();
    ledger
        .process(&SignedInstruction::sign(ix, &user).unwrap())
        .expect("add should apply after reopen");
    let playlist: Playlist = ledger.fetch(&playlist_address).unwrap().unwrap();
    assert_eq!(playlist.tracks_count, 1);
    assert!(ledger.check_integrity().unwrap().is_empty());
}

#[test]
fn test_rejected_instruction_is_not_persisted() {
    let temp = TempFile::new("tuneledger_rejected");
    let user = Keypair::from_seed(&[1; 32]);
    let builder = InstructionBuilder::default();
    let ix = builder
        .create_user_profile(&user.pubkey(), CreateUserProfile::new("testuser"))
        .unwrap();

    let store = SqliteStore::create(&temp.path, &DEFAULT_PROGRAM_ID).unwrap();
    let mut ledger = ledger(store);
    ledger
        .process(&SignedInstruction::sign(ix.clone(), &user).unwrap())
        .unwrap();
    let result = ledger.process(&SignedInstruction::sign(ix, &user).unwrap());
    assert!(matches!(result, Err(TuneLedgerError::AlreadyInitialized(_))));
    drop(ledger);

    let store = SqliteStore::open(&temp.path, &DEFAULT_PROGRAM_ID).unwrap();
    assert_eq!(store.sequence().unwrap(), 1);
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn test_create_refuses_existing_file() {
    let temp = TempFile::new("tuneledger_existing");
    SqliteStore::create(&temp.path, &DEFAULT_PROGRAM_ID).expect("first create should succeed");

    let result = SqliteStore::create(&temp.path, &DEFAULT_PROGRAM_ID);
    assert!(matches!(result, Err(TuneLedgerError::Storage(_))));
}

#[test]
fn test_open_missing_file_fails() {
    let temp = TempFile::new("tuneledger_missing");
    let result = SqliteStore::open(&temp.path, &DEFAULT_PROGRAM_ID);
    assert!(matches!(result, Err(TuneLedgerError::NotFound(_))));
}

#[test]
fn test_open_with_other_program_fails() {
    let temp = TempFile::new("tuneledger_program");
    SqliteStore::create(&temp.path, &DEFAULT_PROGRAM_ID).unwrap();

    let result = SqliteStore::open(&temp.path, &Pubkey::new([9; 32]));
    assert!(matches!(result, Err(TuneLedgerError::Storage(_))));
}
