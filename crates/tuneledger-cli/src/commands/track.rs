use chrono::Utc;

use tuneledger_core::instruction::CreateTrack;
use tuneledger_core::state::Track;
use tuneledger_core::{AnyRecord, Pubkey};

use crate::app::{AppContext, LocalClient};
use crate::cli::{TrackCreateArgs, TrackPlayArgs, TrackRefArgs};
use crate::helpers::parse_timestamp;
use crate::output::print_record;

use super::{explain_duplicate, fetch_required, report};

fn lookup(client: &LocalClient, args: &TrackRefArgs) -> anyhow::Result<(Pubkey, Track)> {
    let address = client.builder().addresses().track(&args.title, &args.artist)?;
    let track = fetch_required(
        client,
        &address,
        &format!("track {:?} by {:?}", args.title, args.artist),
        "Check the title and artist, or run `tuneledger track create` first.",
    )?;
    Ok((address, track))
}

pub fn handle_create(ctx: &AppContext, args: &TrackCreateArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let mut payload = CreateTrack::new(args.title.as_str(), args.artist.as_str(), args.duration);
    if let Some(album) = &args.album {
        payload = payload.with_album(album.as_str());
    }
    if let Some(genre) = &args.genre {
        payload = payload.with_genre(genre.as_str());
    }
    if let Some(url) = &args.audio_url {
        payload = payload.with_audio_url(url.as_str());
    }
    if let Some(image) = &args.cover_image {
        payload = payload.with_cover_image(image.as_str());
    }
    let creator = client.pubkey();
    let ix = client.builder().create_track(&creator, payload)?;
    let confirmation = client.send(ix).map_err(|err| {
        explain_duplicate(
            err,
            format!("Track {:?} by {:?} already exists", args.title, args.artist),
            "Tracks are unique per title and artist.",
        )
    })?;

    let address = client.builder().addresses().track(&args.title, &args.artist)?;
    report(
        ctx,
        "Track created",
        &confirmation,
        &[("Title", args.title.clone()), ("Address", address.to_string())],
    )
}

pub fn handle_show(ctx: &AppContext, args: &TrackRefArgs) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let (address, track) = lookup(&client, args)?;
    print_record(&ctx.ui(), &address, &AnyRecord::from(track))
}

pub fn handle_like(ctx: &AppContext, args: &TrackRefArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, track) = lookup(&client, args)?;
    let user = client.pubkey();
    let ix = client.builder().like_track(&user, &address, &track.created_by)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Track liked",
        &confirmation,
        &[("Likes", track.likes_count.saturating_add(1).to_string())],
    )
}

pub fn handle_unlike(ctx: &AppContext, args: &TrackRefArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, track) = lookup(&client, args)?;
    let user = client.pubkey();
    let ix = client.builder().unlike_track(&user, &address, &track.created_by)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Like removed",
        &confirmation,
        &[("Likes", track.likes_count.saturating_sub(1).to_string())],
    )
}

pub fn handle_play(ctx: &AppContext, args: &TrackPlayArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, track) = lookup(&client, &args.track)?;
    let played_at = match args.at.as_deref() {
        Some(at) => parse_timestamp(at)?,
        None => Utc::now().timestamp(),
    };
    let user = client.pubkey();
    let ix = client.builder().play_track(
        &user,
        &address,
        &track.created_by,
        args.seconds,
        played_at,
    )?;
    let confirmation = client.send(ix)?;

    let play = client.builder().addresses().track_play(&address, &user, played_at)?;
    report(
        ctx,
        "Play recorded",
        &confirmation,
        &[
            ("Plays", track.plays_count.saturating_add(1).to_string()),
            ("Address", play.to_string()),
        ],
    )
}
