use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tuneledger"))
}

struct Home {
    _dir: TempDir,
    config: PathBuf,
    data: PathBuf,
}

fn temp_xdg_dirs() -> Home {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("c");
    let data = dir.path().join("d");
    std::fs::create_dir_all(&config).expect("create config dir");
    std::fs::create_dir_all(&data).expect("create data dir");
    Home {
        _dir: dir,
        config,
        data,
    }
}

fn apply_xdg_env(cmd: &mut Command, config: &Path, data: &Path) {
    cmd.env("XDG_CONFIG_HOME", config)
        .env("XDG_DATA_HOME", data)
        .env_remove("TUNELEDGER_CONFIG")
        .env_remove("TUNELEDGER_PATH")
        .env_remove("TUNELEDGER_KEYPAIR")
        .env_remove("TUNELEDGER_LOG")
        .env("TERM", "dumb");
}

fn run(home: &Home, args: &[&str]) -> Output {
    let mut cmd = Command::new(bin());
    cmd.args(args);
    apply_xdg_env(&mut cmd, &home.config, &home.data);
    cmd.output().expect("run tuneledger")
}

fn run_ok(home: &Home, args: &[&str]) -> String {
    let output = run(home, args);
    assert!(
        output.status.success(),
        "tuneledger {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

fn field<'a>(stdout: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("{}=", key);
    stdout.lines().find_map(|line| line.strip_prefix(prefix.as_str()))
}

fn initialized() -> (Home, String) {
    let home = temp_xdg_dirs();
    let stdout = run_ok(&home, &["init"]);
    let pubkey = field(&stdout, "pubkey").expect("pubkey line").to_string();
    (home, pubkey)
}

#[test]
fn test_init_creates_config_key_and_ledger() {
    let (home, pubkey) = initialized();
    assert_eq!(pubkey.len(), 64);
    assert!(home.config.join("tuneledger").join("config.toml").exists());
    assert!(home.config.join("tuneledger").join("id.key").exists());
    assert!(home.data.join("tuneledger").join("ledger.db").exists());

    let again = run(&home, &["init"]);
    assert_eq!(again.status.code(), Some(4));
}

#[test]
fn test_track_like_cycle() {
    let (home, _) = initialized();
    run_ok(&home, &["profile", "create", "testuser"]);
    run_ok(
        &home,
        &[
            "track", "create", "Test Song", "Test Artist", "--duration", "180", "--genre", "rock",
        ],
    );

    let liked = run_ok(&home, &["track", "like", "Test Song", "Test Artist"]);
    assert_eq!(field(&liked, "likes"), Some("1"));
    let unliked = run_ok(&home, &["track", "unlike", "Test Song", "Test Artist"]);
    assert_eq!(field(&unliked, "likes"), Some("0"));

    let again = run(&home, &["track", "unlike", "Test Song", "Test Artist"]);
    assert_eq!(again.status.code(), Some(3));

    let address = run_ok(&home, &["address", "track", "Test Song", "Test Artist"]);
    let json = run_ok(&home, &["record", "--json", address.trim()]);
    let value: serde_json::Value = serde_json::from_str(&json).expect("record json");
    assert_eq!(value["kind"], "Track");
    assert_eq!(value["address"], address.trim());
    assert_eq!(value["record"]["likes_count"], 0);
    assert_eq!(value["record"]["duration"], 180);

    let check = run_ok(&home, &["check"]);
    assert!(check.contains("Integrity check: OK"));
}

#[test]
fn test_playlist_positions() {
    let (home, _) = initialized();
    run_ok(&home, &["profile", "create", "testuser"]);
    for title in ["One", "Two"] {
        run_ok(
            &home,
            &["track", "create", title, "Test Artist", "--duration", "200"],
        );
    }
    run_ok(&home, &["playlist", "create", "Road Trip"]);

    let first = run_ok(
        &home,
        &["playlist", "add-track", "Road Trip", "--title", "One", "--artist", "Test Artist"],
    );
    assert_eq!(field(&first, "position"), Some("0"));
    let second = run_ok(
        &home,
        &["playlist", "add-track", "Road Trip", "--title", "Two", "--artist", "Test Artist"],
    );
    assert_eq!(field(&second, "position"), Some("1"));

    run_ok(
        &home,
        &["playlist", "remove-track", "Road Trip", "--title", "One", "--artist", "Test Artist"],
    );
    let shown = run_ok(&home, &["playlist", "show", "Road Trip"]);
    assert_eq!(field(&shown, "tracks"), Some("1"));
}

#[test]
fn test_self_follow_is_invalid_input() {
    let (home, pubkey) = initialized();
    run_ok(&home, &["profile", "create", "testuser"]);
    let output = run(&home, &["follow", &pubkey]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_duplicate_profile_is_rejected() {
    let (home, _) = initialized();
    run_ok(&home, &["profile", "create", "testuser"]);
    let output = run(&home, &["profile", "create", "testuser"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_missing_config_is_not_found() {
    let home = temp_xdg_dirs();
    let output = run(&home, &["profile", "show"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No config found"));
}

#[test]
fn test_insights_from_plays() {
    let (home, _) = initialized();
    run_ok(&home, &["profile", "create", "testuser"]);
    run_ok(
        &home,
        &["track", "create", "Test Song", "Test Artist", "--duration", "180", "--genre", "Rock"],
    );
    run_ok(
        &home,
        &["track", "play", "Test Song", "Test Artist", "--seconds", "120", "--at", "1700000000"],
    );
    run_ok(
        &home,
        &["track", "play", "Test Song", "Test Artist", "--seconds", "60", "--at", "1700000100"],
    );

    let json = run_ok(&home, &["--json", "insights"]);
    let value: serde_json::Value = serde_json::from_str(&json).expect("insights json");
    assert_eq!(value["kind"], "UserInsights");
    assert_eq!(value["record"]["total_listening_time"], 180);
    assert_eq!(value["record"]["favorite_genre"], "Rock");
}
