use tuneledger_core::instruction::{CreatePlaylist, UpdatePlaylist};
use tuneledger_core::state::Playlist;
use tuneledger_core::{AnyRecord, Pubkey};

use crate::app::{AppContext, LocalClient};
use crate::cli::{
    CollaboratorArgs, PlaylistCreateArgs, PlaylistRefArgs, PlaylistTrackArgs, PlaylistUpdateArgs,
};
use crate::helpers::{parse_permissions, parse_pubkey};
use crate::output::print_record;

use super::{explain_duplicate, fetch_required, report};

/// Resolve a playlist by name; the owner defaults to the signer.
fn lookup(client: &LocalClient, args: &PlaylistRefArgs) -> anyhow::Result<(Pubkey, Playlist)> {
    let owner = match args.owner.as_deref() {
        Some(owner) => parse_pubkey("owner", owner)?,
        None => client.pubkey(),
    };
    let address = client.builder().addresses().playlist(&owner, &args.name)?;
    let playlist = fetch_required(
        client,
        &address,
        &format!("playlist {:?} owned by {}", args.name, owner.short()),
        "Check the name and --owner, or run `tuneledger playlist create` first.",
    )?;
    Ok((address, playlist))
}

fn track_address(client: &LocalClient, title: &str, artist: &str) -> anyhow::Result<Pubkey> {
    Ok(client.builder().addresses().track(title, artist)?)
}

pub fn handle_create(ctx: &AppContext, args: &PlaylistCreateArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let mut payload = CreatePlaylist::new(args.name.as_str())
        .with_public(!args.private)
        .with_collaborative(args.collaborative);
    if let Some(description) = &args.description {
        payload = payload.with_description(description.as_str());
    }
    let owner = client.pubkey();
    let ix = client.builder().create_playlist(&owner, payload)?;
    let confirmation = client.send(ix).map_err(|err| {
        explain_duplicate(
            err,
            format!("You already have a playlist named {:?}", args.name),
            "Use `tuneledger playlist update` to change it.",
        )
    })?;

    let address = client.builder().addresses().playlist(&owner, &args.name)?;
    report(
        ctx,
        "Playlist created",
        &confirmation,
        &[("Name", args.name.clone()), ("Address", address.to_string())],
    )
}

pub fn handle_update(ctx: &AppContext, args: &PlaylistUpdateArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, _) = lookup(&client, &args.playlist)?;
    let payload = UpdatePlaylist {
        description: args.description.clone(),
        is_public: args.public,
        is_collaborative: args.collaborative,
    };
    let authority = client.pubkey();
    let ix = client.builder().update_playlist(&authority, &address, payload)?;
    let confirmation = client.send(ix)?;
    report(ctx, "Playlist updated", &confirmation, &[])
}

pub fn handle_show(ctx: &AppContext, args: &PlaylistRefArgs) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let (address, playlist) = lookup(&client, args)?;
    print_record(&ctx.ui(), &address, &AnyRecord::from(playlist))
}

pub fn handle_add_track(ctx: &AppContext, args: &PlaylistTrackArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, playlist) = lookup(&client, &args.playlist)?;
    let track = track_address(&client, &args.title, &args.artist)?;
    let authority = client.pubkey();
    let ix = client
        .builder()
        .add_track_to_playlist(&authority, &address, &track)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Track added",
        &confirmation,
        &[
            ("Playlist", playlist.name),
            ("Position", playlist.tracks_count.to_string()),
        ],
    )
}

pub fn handle_remove_track(ctx: &AppContext, args: &PlaylistTrackArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, playlist) = lookup(&client, &args.playlist)?;
    let track = track_address(&client, &args.title, &args.artist)?;
    let authority = client.pubkey();
    let ix = client
        .builder()
        .remove_track_from_playlist(&authority, &address, &track)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Track removed",
        &confirmation,
        &[("Playlist", playlist.name)],
    )
}

pub fn handle_like(ctx: &AppContext, args: &PlaylistRefArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, playlist) = lookup(&client, args)?;
    let user = client.pubkey();
    let ix = client
        .builder()
        .like_playlist(&user, &address, &playlist.authority)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Playlist liked",
        &confirmation,
        &[("Likes", playlist.likes_count.saturating_add(1).to_string())],
    )
}

pub fn handle_unlike(ctx: &AppContext, args: &PlaylistRefArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (address, playlist) = lookup(&client, args)?;
    let user = client.pubkey();
    let ix = client
        .builder()
        .unlike_playlist(&user, &address, &playlist.authority)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Like removed",
        &confirmation,
        &[("Likes", playlist.likes_count.saturating_sub(1).to_string())],
    )
}

pub fn handle_add_collaborator(ctx: &AppContext, args: &CollaboratorArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let owner = client.pubkey();
    let address = client.builder().addresses().playlist(&owner, &args.name)?;
    let collaborator = parse_pubkey("user", &args.user)?;
    let permissions = parse_permissions(&args.permissions)?;
    let ix = client
        .builder()
        .add_collaborator(&owner, &address, &collaborator, permissions)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Collaborator added",
        &confirmation,
        &[
            ("User", collaborator.to_string()),
            ("Permissions", format!("{:#05b}", permissions)),
        ],
    )
}
