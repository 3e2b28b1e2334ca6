use serde_json::{json, Map, Value};

use tuneledger_core::state::{ActivityType, TargetType};
use tuneledger_core::{AnyRecord, Confirmation, Pubkey};

use crate::helpers::format_timestamp;
use crate::ui::{header, kv, print, receipt, OutputMode, UiContext};

use super::json::{print_json, record_json};

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn target_label(value: u8) -> String {
    match TargetType::from_u8(value) {
        Some(TargetType::Track) => "track".to_string(),
        Some(TargetType::Playlist) => "playlist".to_string(),
        Some(TargetType::User) => "user".to_string(),
        None => value.to_string(),
    }
}

/// Display rows for a record, in schema order.
pub fn record_fields(record: &AnyRecord) -> Vec<(&'static str, String)> {
    match record {
        AnyRecord::UserProfile(p) => vec![
            ("Authority", p.authority.to_string()),
            ("Username", p.username.clone()),
            ("Display Name", p.display_name.clone()),
            ("Bio", p.bio.clone()),
            ("Profile Image", p.profile_image.clone()),
            ("Followers", p.followers_count.to_string()),
            ("Following", p.following_count.to_string()),
            ("Created", format_timestamp(p.created_at)),
        ],
        AnyRecord::UserStats(s) => vec![
            ("User", s.user.to_string()),
            ("Tracks Created", s.tracks_created.to_string()),
            ("Playlists Created", s.playlists_created.to_string()),
            ("Likes Received", s.total_likes_received.to_string()),
            ("Plays", s.total_plays.to_string()),
            ("Last Active", format_timestamp(s.last_active)),
        ],
        AnyRecord::Track(t) => vec![
            ("Title", t.title.clone()),
            ("Artist", t.artist.clone()),
            ("Album", t.album.clone()),
            ("Genre", t.genre.clone()),
            ("Duration", format!("{}s", t.duration)),
            ("Audio URL", t.audio_url.clone()),
            ("Cover Image", t.cover_image.clone()),
            ("Likes", t.likes_count.to_string()),
            ("Plays", t.plays_count.to_string()),
            ("Created By", t.created_by.to_string()),
            ("Created", format_timestamp(t.created_at)),
        ],
        AnyRecord::TrackPlay(p) => vec![
            ("Track", p.track.to_string()),
            ("User", p.user.to_string()),
            ("Duration Played", format!("{}s", p.duration_played)),
            ("Played", format_timestamp(p.created_at)),
        ],
        AnyRecord::Playlist(p) => vec![
            ("Authority", p.authority.to_string()),
            ("Name", p.name.clone()),
            ("Description", p.description.clone()),
            ("Public", yes_no(p.is_public)),
            ("Collaborative", yes_no(p.is_collaborative)),
            ("Tracks", p.tracks_count.to_string()),
            ("Likes", p.likes_count.to_string()),
            ("Plays", p.plays_count.to_string()),
            ("Created", format_timestamp(p.created_at)),
            ("Updated", format_timestamp(p.updated_at)),
        ],
        AnyRecord::PlaylistTrack(m) => vec![
            ("Playlist", m.playlist.to_string()),
            ("Track", m.track.to_string()),
            ("Added By", m.added_by.to_string()),
            ("Position", m.position.to_string()),
            ("Added", format_timestamp(m.added_at)),
        ],
        AnyRecord::PlaylistCollaborator(c) => vec![
            ("Playlist", c.playlist.to_string()),
            ("User", c.user.to_string()),
            ("Permissions", format!("{:#05b}", c.permissions)),
            ("Added", format_timestamp(c.added_at)),
        ],
        AnyRecord::TrackLike(l) => vec![
            ("User", l.user.to_string()),
            ("Track", l.track.to_string()),
            ("Created", format_timestamp(l.created_at)),
        ],
        AnyRecord::PlaylistLike(l) => vec![
            ("User", l.user.to_string()),
            ("Playlist", l.playlist.to_string()),
            ("Created", format_timestamp(l.created_at)),
        ],
        AnyRecord::UserFollow(f) => vec![
            ("Follower", f.follower.to_string()),
            ("Following", f.following.to_string()),
            ("Created", format_timestamp(f.created_at)),
        ],
        AnyRecord::ActivityFeed(a) => vec![
            ("User", a.user.to_string()),
            (
                "Activity",
                ActivityType::from_u8(a.activity_type)
                    .map(|t| t.label().to_string())
                    .unwrap_or_else(|| a.activity_type.to_string()),
            ),
            ("Target", a.target.to_string()),
            ("Metadata", a.metadata.clone()),
            ("Created", format_timestamp(a.created_at)),
        ],
        AnyRecord::Recommendation(r) => vec![
            ("User", r.user.to_string()),
            ("Type", target_label(r.recommendation_type)),
            ("Target", r.target.to_string()),
            ("Score", format!("{:.2}", r.score)),
            ("Reason", r.reason.clone()),
            ("Viewed", yes_no(r.is_viewed)),
            ("Created", format_timestamp(r.created_at)),
        ],
        AnyRecord::SearchIndex(s) => vec![
            ("Term", s.search_term.clone()),
            ("Type", target_label(s.target_type)),
            ("Target", s.target_pubkey.to_string()),
            ("Created", format_timestamp(s.created_at)),
        ],
        AnyRecord::UserInsights(i) => vec![
            ("User", i.user.to_string()),
            ("Listening Time", format!("{}s", i.total_listening_time)),
            ("Favorite Genre", i.favorite_genre.clone()),
            (
                "Most Played",
                i.most_played_track
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Discovery Score", format!("{:.3}", i.discovery_score)),
            ("Social Engagement", format!("{:.3}", i.social_engagement)),
            ("Generated", format_timestamp(i.generated_at)),
        ],
    }
}

/// Print one record in the UI's mode.
pub fn print_record(ui: &UiContext, address: &Pubkey, record: &AnyRecord) -> anyhow::Result<()> {
    if ui.mode.is_json() {
        return print_json(&record_json(address, record)?);
    }
    let kind = record.kind().name();
    match ui.mode {
        OutputMode::Pretty => print(ui, &header(ui, kind, Some(&address.short()))),
        _ => print(ui, &kv(ui, "Kind", kind)),
    }
    print(ui, &kv(ui, "Address", &address.to_string()));
    for (key, value) in record_fields(record) {
        print(ui, &kv(ui, key, &value));
    }
    Ok(())
}

/// Print the outcome of an applied instruction.
pub fn print_confirmation(
    ui: &UiContext,
    title: &str,
    confirmation: &Confirmation,
    items: &[(&str, String)],
) -> anyhow::Result<()> {
    if ui.mode.is_json() {
        let mut map = Map::new();
        map.insert("status".to_string(), json!("ok"));
        map.insert("action".to_string(), json!(title));
        map.insert("signature".to_string(), json!(confirmation.signature));
        map.insert("sequence".to_string(), json!(confirmation.sequence));
        for (key, value) in items {
            map.insert(key.to_lowercase().replace(' ', "_"), json!(value));
        }
        return print_json(&Value::Object(map));
    }
    let mut rows: Vec<(&str, String)> = items.to_vec();
    rows.push(("Sequence", confirmation.sequence.to_string()));
    print(ui, &receipt(ui, title, &rows));
    Ok(())
}
