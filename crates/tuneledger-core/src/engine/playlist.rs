use tracing::info;

use crate::engine::context::Context;
use crate::engine::{decrement, increment};
use crate::error::{Result, TuneLedgerError};
use crate::instruction::{AddCollaborator, CreatePlaylist, UpdatePlaylist};
use crate::pubkey::Pubkey;
use crate::state::{
    Playlist, PlaylistCollaborator, PlaylistLike, PlaylistTrack, Track, PERMISSION_ADD_TRACKS,
    PERMISSION_EDIT_INFO, PERMISSION_REMOVE_TRACKS,
};
use crate::validation;

pub(crate) fn create(ctx: &mut Context<'_>, args: CreatePlaylist) -> Result<()> {
    ctx.expect_len(3)?;
    let signer = ctx.signer;
    let playlist = ctx.expect(0, "playlist", &ctx.book.playlist(&signer, &args.name)?, true)?;
    let stats_address = ctx.expect(1, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    ctx.expect_signer(2, "authority")?;

    let record = Playlist {
        authority: signer,
        name: args.name,
        description: args.description,
        is_public: args.is_public,
        is_collaborative: args.is_collaborative,
        tracks_count: 0,
        likes_count: 0,
        plays_count: 0,
        created_at: ctx.now,
        updated_at: ctx.now,
    };
    ctx.init(&playlist, &record)?;

    let mut stats = ctx.stats(&stats_address, &signer)?;
    stats.playlists_created = increment(stats.playlists_created, "playlists created")?;
    stats.last_active = ctx.now;
    ctx.store(&stats_address, &stats)?;

    info!(name = %record.name, authority = %signer.short(), "Playlist created");
    Ok(())
}

/// Load the playlist at account 0 and check it sits at its canonical address.
fn load_playlist(ctx: &Context<'_>, writable: bool) -> Result<(Pubkey, Playlist)> {
    let address = ctx.account(0, "playlist")?.pubkey;
    let playlist = ctx.require::<Playlist>(&address)?;
    ctx.expect(
        0,
        "playlist",
        &ctx.book.playlist(&playlist.authority, &playlist.name)?,
        writable,
    )?;
    Ok((address, playlist))
}

/// The signer's collaborator record, if any, from account `index`.
fn load_collaborator(
    ctx: &Context<'_>,
    index: usize,
    playlist: &Pubkey,
) -> Result<Option<PlaylistCollaborator>> {
    let signer = ctx.signer;
    let address = ctx.expect(
        index,
        "collaborator",
        &ctx.book.playlist_collaborator(playlist, &signer)?,
        false,
    )?;
    ctx.load::<PlaylistCollaborator>(&address)
}

fn require_permission(
    ctx: &Context<'_>,
    playlist: &Playlist,
    collaborator: Option<&PlaylistCollaborator>,
    permission: u8,
    action: &str,
) -> Result<()> {
    let allowed = playlist.authority == ctx.signer
        || collaborator.is_some_and(|c| c.allows(permission))
        || (permission == PERMISSION_ADD_TRACKS && playlist.is_collaborative);
    if !allowed {
        return Err(TuneLedgerError::Unauthorized(format!(
            "{} may not {} playlist {}",
            ctx.signer.short(),
            action,
            playlist.name
        )));
    }
    Ok(())
}

pub(crate) fn update(ctx: &mut Context<'_>, args: UpdatePlaylist) -> Result<()> {
    ctx.expect_len(3)?;
    let (address, mut playlist) = load_playlist(ctx, true)?;
    let collaborator = load_collaborator(ctx, 1, &address)?;
    ctx.expect_signer(2, "authority")?;
    require_permission(ctx, &playlist, collaborator.as_ref(), PERMISSION_EDIT_INFO, "edit")?;

    if let Some(description) = args.description {
        playlist.description = description;
    }
    if let Some(is_public) = args.is_public {
        playlist.is_public = is_public;
    }
    if let Some(is_collaborative) = args.is_collaborative {
        playlist.is_collaborative = is_collaborative;
    }
    playlist.updated_at = ctx.now;
    ctx.store(&address, &playlist)?;

    info!(name = %playlist.name, "Playlist updated");
    Ok(())
}

/// Shared checks for add/remove track: returns (playlist address, playlist,
/// membership address, track address, track, collaborator).
fn membership_accounts(
    ctx: &Context<'_>,
) -> Result<(Pubkey, Playlist, Pubkey, Pubkey, Track, Option<PlaylistCollaborator>)> {
    ctx.expect_len(5)?;
    let (address, playlist) = load_playlist(ctx, true)?;

    let track_address = ctx.account(2, "track")?.pubkey;
    let track = ctx.require::<Track>(&track_address)?;
    ctx.expect(2, "track", &ctx.book.track(&track.title, &track.artist)?, false)?;

    let membership = ctx.expect(
        1,
        "playlist track",
        &ctx.book.playlist_track(&address, &track_address)?,
        true,
    )?;
    let collaborator = load_collaborator(ctx, 3, &address)?;
    ctx.expect_signer(4, "authority")?;
    Ok((address, playlist, membership, track_address, track, collaborator))
}

pub(crate) fn add_track(ctx: &mut Context<'_>) -> Result<()> {
    let (address, mut playlist, membership, track_address, track, collaborator) =
        membership_accounts(ctx)?;
    require_permission(ctx, &playlist, collaborator.as_ref(), PERMISSION_ADD_TRACKS, "add tracks to")?;

    if ctx.exists(&membership)? {
        return Err(TuneLedgerError::AlreadyExists(format!(
            "{} is already in playlist {}",
            track.title, playlist.name
        )));
    }

    // Position is the count at insertion time. Removals never renumber, so
    // after a removal the next add can reuse a live row's position; it is an
    // ordering hint, not a unique key.
    let position = playlist.tracks_count;
    ctx.init(
        &membership,
        &PlaylistTrack {
            playlist: address,
            track: track_address,
            added_by: ctx.signer,
            position,
            added_at: ctx.now,
        },
    )?;
    playlist.tracks_count = increment(playlist.tracks_count, "playlist tracks")?;
    playlist.updated_at = ctx.now;
    ctx.store(&address, &playlist)?;

    info!(title = %track.title, playlist = %playlist.name, position, "Track added to playlist");
    Ok(())
}

pub(crate) fn remove_track(ctx: &mut Context<'_>) -> Result<()> {
    let (address, mut playlist, membership, _, track, collaborator) = membership_accounts(ctx)?;
    require_permission(
        ctx,
        &playlist,
        collaborator.as_ref(),
        PERMISSION_REMOVE_TRACKS,
        "remove tracks from",
    )?;

    if ctx.load::<PlaylistTrack>(&membership)?.is_none() {
        return Err(TuneLedgerError::NotFound(format!(
            "{} is not in playlist {}",
            track.title, playlist.name
        )));
    }
    ctx.close(&membership)?;
    playlist.tracks_count = decrement(playlist.tracks_count, "playlist tracks")?;
    playlist.updated_at = ctx.now;
    ctx.store(&address, &playlist)?;

    info!(title = %track.title, playlist = %playlist.name, "Track removed from playlist");
    Ok(())
}

pub(crate) fn add_collaborator(ctx: &mut Context<'_>, args: AddCollaborator) -> Result<()> {
    ctx.expect_len(4)?;
    let signer = ctx.signer;
    let user = ctx.account(2, "collaborator key")?.pubkey;
    validation::distinct("add as collaborator", &signer, &user)?;

    let (address, playlist) = load_playlist(ctx, false)?;
    let record_address = ctx.expect(
        1,
        "playlist collaborator",
        &ctx.book.playlist_collaborator(&address, &user)?,
        true,
    )?;
    ctx.expect_signer(3, "authority")?;

    if playlist.authority != signer {
        return Err(TuneLedgerError::Unauthorized(format!(
            "only the owner may add collaborators to {}",
            playlist.name
        )));
    }
    if ctx.exists(&record_address)? {
        return Err(TuneLedgerError::AlreadyExists(format!(
            "{} already collaborates on {}",
            user.short(),
            playlist.name
        )));
    }
    ctx.init(
        &record_address,
        &PlaylistCollaborator {
            playlist: address,
            user,
            permissions: args.permissions,
            added_at: ctx.now,
        },
    )?;

    info!(playlist = %playlist.name, collaborator = %user.short(), permissions = args.permissions, "Collaborator added");
    Ok(())
}

/// Shared checks for like/unlike: returns (playlist address, playlist, like
/// address, user stats, owner stats).
fn like_accounts(ctx: &Context<'_>) -> Result<(Pubkey, Playlist, Pubkey, Pubkey, Pubkey)> {
    ctx.expect_len(5)?;
    let signer = ctx.signer;
    let (address, playlist) = load_playlist(ctx, true)?;
    let like = ctx.expect(1, "playlist like", &ctx.book.playlist_like(&signer, &address)?, true)?;
    let user_stats = ctx.expect(2, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    let owner_stats = ctx.expect(3, "owner stats", &ctx.book.user_stats(&playlist.authority)?, true)?;
    ctx.expect_signer(4, "user")?;
    Ok((address, playlist, like, user_stats, owner_stats))
}

pub(crate) fn like(ctx: &mut Context<'_>) -> Result<()> {
    let (address, mut playlist, like, user_stats, owner_stats) = like_accounts(ctx)?;
    let signer = ctx.signer;

    if ctx.exists(&like)? {
        return Err(TuneLedgerError::AlreadyExists(format!(
            "{} already likes playlist {}",
            signer.short(),
            playlist.name
        )));
    }
    ctx.init(
        &like,
        &PlaylistLike {
            user: signer,
            playlist: address,
            created_at: ctx.now,
        },
    )?;

    playlist.likes_count = increment(playlist.likes_count, "playlist likes")?;
    ctx.store(&address, &playlist)?;

    ctx.touch(&user_stats)?;
    let mut stats = ctx.stats(&owner_stats, &playlist.authority)?;
    stats.total_likes_received = increment(stats.total_likes_received, "likes received")?;
    ctx.store(&owner_stats, &stats)?;

    info!(name = %playlist.name, likes = playlist.likes_count, "Playlist liked");
    Ok(())
}

pub(crate) fn unlike(ctx: &mut Context<'_>) -> Result<()> {
    let (address, mut playlist, like, user_stats, owner_stats) = like_accounts(ctx)?;
    let signer = ctx.signer;

    if ctx.load::<PlaylistLike>(&like)?.is_none() {
        return Err(TuneLedgerError::NotFound(format!(
            "{} does not like playlist {}",
            signer.short(),
            playlist.name
        )));
    }
    ctx.close(&like)?;

    playlist.likes_count = decrement(playlist.likes_count, "playlist likes")?;
    ctx.store(&address, &playlist)?;

    ctx.touch(&user_stats)?;
    let mut stats = ctx.stats(&owner_stats, &playlist.authority)?;
    stats.total_likes_received = decrement(stats.total_likes_received, "likes received")?;
    ctx.store(&owner_stats, &stats)?;

    info!(name = %playlist.name, likes = playlist.likes_count, "Playlist unliked");
    Ok(())
}
