use tracing::info;

use crate::engine::context::Context;
use crate::engine::{decrement, increment};
use crate::error::{Result, TuneLedgerError};
use crate::instruction::{CreateTrack, PlayTrack};
use crate::pubkey::Pubkey;
use crate::state::{Track, TrackLike, TrackPlay};

pub(crate) fn create(ctx: &mut Context<'_>, args: CreateTrack) -> Result<()> {
    ctx.expect_len(3)?;
    let signer = ctx.signer;
    let address = ctx.book.track(&args.title, &args.artist)?;
    let track = ctx.expect(0, "track", &address, true)?;
    let stats_address = ctx.expect(1, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    ctx.expect_signer(2, "authority")?;

    let record = Track {
        title: args.title,
        artist: args.artist,
        album: args.album,
        genre: args.genre,
        duration: args.duration,
        audio_url: args.audio_url,
        cover_image: args.cover_image,
        likes_count: 0,
        plays_count: 0,
        created_by: signer,
        created_at: ctx.now,
    };
    ctx.init(&track, &record)?;

    let mut stats = ctx.stats(&stats_address, &signer)?;
    stats.tracks_created = increment(stats.tracks_created, "tracks created")?;
    stats.last_active = ctx.now;
    ctx.store(&stats_address, &stats)?;

    info!(title = %record.title, artist = %record.artist, "Track created");
    Ok(())
}

/// Load the track at account 0 and check it sits at its canonical address.
fn load_track(ctx: &Context<'_>) -> Result<(Pubkey, Track)> {
    let address = ctx.account(0, "track")?.pubkey;
    let track = ctx.require::<Track>(&address)?;
    ctx.expect(0, "track", &ctx.book.track(&track.title, &track.artist)?, true)?;
    Ok((address, track))
}

pub(crate) fn play(ctx: &mut Context<'_>, args: PlayTrack) -> Result<()> {
    ctx.expect_len(5)?;
    let signer = ctx.signer;
    let (address, mut track) = load_track(ctx)?;
    let play = ctx.expect(
        1,
        "track play",
        &ctx.book.track_play(&address, &signer, args.played_at)?,
        true,
    )?;
    let user_stats = ctx.expect(2, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    let creator_stats = ctx.expect(3, "creator stats", &ctx.book.user_stats(&track.created_by)?, true)?;
    ctx.expect_signer(4, "user")?;

    ctx.init(
        &play,
        &TrackPlay {
            track: address,
            user: signer,
            duration_played: args.duration_played,
            created_at: args.played_at,
        },
    )?;

    track.plays_count = increment(track.plays_count, "track plays")?;
    ctx.store(&address, &track)?;

    ctx.touch(&user_stats)?;
    let mut stats = ctx.stats(&creator_stats, &track.created_by)?;
    stats.total_plays = increment(stats.total_plays, "total plays")?;
    ctx.store(&creator_stats, &stats)?;

    info!(title = %track.title, artist = %track.artist, "Track played");
    Ok(())
}

/// Shared account checks for like/unlike: returns (track address, track,
/// like address, user stats, creator stats).
fn like_accounts(ctx: &Context<'_>) -> Result<(Pubkey, Track, Pubkey, Pubkey, Pubkey)> {
    ctx.expect_len(5)?;
    let signer = ctx.signer;
    let (address, track) = load_track(ctx)?;
    let like = ctx.expect(1, "track like", &ctx.book.track_like(&signer, &address)?, true)?;
    let user_stats = ctx.expect(2, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    let creator_stats = ctx.expect(3, "creator stats", &ctx.book.user_stats(&track.created_by)?, true)?;
    ctx.expect_signer(4, "user")?;
    Ok((address, track, like, user_stats, creator_stats))
}

pub(crate) fn like(ctx: &mut Context<'_>) -> Result<()> {
    let (address, mut track, like, user_stats, creator_stats) = like_accounts(ctx)?;
    let signer = ctx.signer;

    if ctx.exists(&like)? {
        return Err(TuneLedgerError::AlreadyExists(format!(
            "{} already likes {}",
            signer.short(),
            track.title
        )));
    }
    ctx.init(
        &like,
        &TrackLike {
            user: signer,
            track: address,
            created_at: ctx.now,
        },
    )?;

    track.likes_count = increment(track.likes_count, "track likes")?;
    ctx.store(&address, &track)?;

    ctx.touch(&user_stats)?;
    let mut stats = ctx.stats(&creator_stats, &track.created_by)?;
    stats.total_likes_received = increment(stats.total_likes_received, "likes received")?;
    ctx.store(&creator_stats, &stats)?;

    info!(title = %track.title, likes = track.likes_count, "Track liked");
    Ok(())
}

pub(crate) fn unlike(ctx: &mut Context<'_>) -> Result<()> {
    let (address, mut track, like, user_stats, creator_stats) = like_accounts(ctx)?;
    let signer = ctx.signer;

    if ctx.load::<TrackLike>(&like)?.is_none() {
        return Err(TuneLedgerError::NotFound(format!(
            "{} does not like {}",
            signer.short(),
            track.title
        )));
    }
    ctx.close(&like)?;

    track.likes_count = decrement(track.likes_count, "track likes")?;
    ctx.store(&address, &track)?;

    ctx.touch(&user_stats)?;
    let mut stats = ctx.stats(&creator_stats, &track.created_by)?;
    stats.total_likes_received = decrement(stats.total_likes_received, "likes received")?;
    ctx.store(&creator_stats, &stats)?;

    info!(title = %track.title, likes = track.likes_count, "Track unliked");
    Ok(())
}
