use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::engine::context::Context;
use crate::error::{Result, TuneLedgerError};
use crate::instruction::{CreateRecommendation, CreateSearchIndex};
use crate::pubkey::Pubkey;
use crate::state::{AnyRecord, Recommendation, SearchIndex, Track, UserInsights, UserProfile};

/// Genre reported when no supplied track carries one.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Follower, following and like totals at which engagement saturates.
const ENGAGEMENT_SCALE: f32 = 100.0;

pub(crate) fn create_search_index(ctx: &mut Context<'_>, args: CreateSearchIndex) -> Result<()> {
    ctx.expect_len(2)?;
    let term = args.validate()?;
    let address = ctx.expect(
        0,
        "search index",
        &ctx.book.search_index(&term, args.target_type)?,
        true,
    )?;
    ctx.expect_signer(1, "authority")?;

    ctx.init(
        &address,
        &SearchIndex {
            search_term: term,
            target_type: args.target_type,
            target_pubkey: args.target,
            created_at: ctx.now,
        },
    )?;

    info!(target = %args.target.short(), target_type = args.target_type, "Search index created");
    Ok(())
}

pub(crate) fn create_recommendation(ctx: &mut Context<'_>, args: CreateRecommendation) -> Result<()> {
    ctx.expect_len(2)?;
    let signer = ctx.signer;
    let address = ctx.expect(
        0,
        "recommendation",
        &ctx.book.recommendation(&signer, &args.target, args.recommendation_type)?,
        true,
    )?;
    ctx.expect_signer(1, "user")?;

    ctx.init(
        &address,
        &Recommendation {
            user: signer,
            recommendation_type: args.recommendation_type,
            target: args.target,
            score: args.score,
            reason: args.reason,
            created_at: ctx.now,
            is_viewed: false,
        },
    )?;

    info!(user = %signer.short(), target = %args.target.short(), score = args.score, "Recommendation created");
    Ok(())
}

pub(crate) fn mark_recommendation_viewed(ctx: &mut Context<'_>) -> Result<()> {
    ctx.expect_len(2)?;
    let signer = ctx.signer;
    let address = ctx.account(0, "recommendation")?.pubkey;
    let mut recommendation = ctx.require::<Recommendation>(&address)?;
    if recommendation.user != signer {
        return Err(TuneLedgerError::Unauthorized(format!(
            "recommendation belongs to {}",
            recommendation.user.short()
        )));
    }
    ctx.expect(
        0,
        "recommendation",
        &ctx.book.recommendation(
            &signer,
            &recommendation.target,
            recommendation.recommendation_type,
        )?,
        true,
    )?;
    ctx.expect_signer(1, "user")?;

    recommendation.is_viewed = true;
    ctx.store(&address, &recommendation)?;

    info!(user = %signer.short(), target = %recommendation.target.short(), "Recommendation viewed");
    Ok(())
}

/// Aggregates over the plays folded into one insights run.
#[derive(Debug, Default)]
struct PlayTally {
    listening_time: u64,
    plays: u64,
    per_track: BTreeMap<Pubkey, u64>,
}

impl PlayTally {
    fn add(&mut self, track: Pubkey, duration_played: u64) -> Result<()> {
        self.listening_time = self
            .listening_time
            .checked_add(duration_played)
            .ok_or_else(|| TuneLedgerError::ArithmeticOverflow("listening time overflow".to_string()))?;
        self.plays += 1;
        *self.per_track.entry(track).or_default() += 1;
        Ok(())
    }

    /// Most plays wins; the map's address order breaks ties.
    fn most_played(&self) -> Option<Pubkey> {
        let mut best: Option<(Pubkey, u64)> = None;
        for (track, count) in &self.per_track {
            if best.map_or(true, |(_, top)| *count > top) {
                best = Some((*track, *count));
            }
        }
        best.map(|(track, _)| track)
    }

    fn favorite_genre(&self, tracks: &BTreeMap<Pubkey, Track>) -> String {
        let mut per_genre: BTreeMap<&str, u64> = BTreeMap::new();
        for (address, count) in &self.per_track {
            if let Some(track) = tracks.get(address).filter(|t| !t.genre.is_empty()) {
                *per_genre.entry(track.genre.as_str()).or_default() += count;
            }
        }
        let mut best: Option<(&str, u64)> = None;
        for (genre, count) in per_genre {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((genre, count));
            }
        }
        best.map_or_else(|| UNKNOWN_GENRE.to_string(), |(genre, _)| genre.to_string())
    }

    fn discovery_score(&self) -> f32 {
        if self.plays == 0 {
            return 0.0;
        }
        self.per_track.len() as f32 / self.plays as f32
    }
}

pub(crate) fn generate_user_insights(ctx: &mut Context<'_>) -> Result<()> {
    let signer = ctx.signer;
    if ctx.accounts().len() < 4 {
        return Err(TuneLedgerError::InvalidAccount(format!(
            "expected at least 4 accounts, got {}",
            ctx.accounts().len()
        )));
    }
    let insights_address = ctx.expect(0, "user insights", &ctx.book.user_insights(&signer)?, true)?;
    let stats_address = ctx.expect(1, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    let profile_address = ctx.expect(2, "user profile", &ctx.book.user_profile(&signer)?, false)?;
    ctx.expect_signer(3, "user")?;
    let profile = ctx.require::<UserProfile>(&profile_address)?;

    let mut tally = PlayTally::default();
    let mut seen_plays = BTreeSet::new();
    let mut tracks = BTreeMap::new();
    for meta in &ctx.accounts()[4..] {
        let bytes = ctx.raw(&meta.pubkey)?.ok_or_else(|| {
            TuneLedgerError::NotFound(format!("record at {}", meta.pubkey.short()))
        })?;
        match AnyRecord::decode(&bytes)? {
            AnyRecord::TrackPlay(play) => {
                if play.user != signer {
                    return Err(TuneLedgerError::InvalidAccount(format!(
                        "play {} belongs to {}",
                        meta.pubkey.short(),
                        play.user.short()
                    )));
                }
                let canonical = ctx.book.track_play(&play.track, &play.user, play.created_at)?;
                if canonical != meta.pubkey {
                    return Err(TuneLedgerError::InvalidAccount(format!(
                        "play {} is not at its derived address",
                        meta.pubkey.short()
                    )));
                }
                // A play listed twice is folded once.
                if seen_plays.insert(meta.pubkey) {
                    tally.add(play.track, play.duration_played)?;
                }
            }
            AnyRecord::Track(track) => {
                if ctx.book.track(&track.title, &track.artist)? != meta.pubkey {
                    return Err(TuneLedgerError::InvalidAccount(format!(
                        "track {} is not at its derived address",
                        meta.pubkey.short()
                    )));
                }
                tracks.insert(meta.pubkey, track);
            }
            other => {
                return Err(TuneLedgerError::InvalidAccount(format!(
                    "{} holds a {} record, expected TrackPlay or Track",
                    meta.pubkey.short(),
                    other.kind().name()
                )));
            }
        }
    }

    let mut stats = ctx.stats(&stats_address, &signer)?;
    stats.last_active = ctx.now;
    ctx.store(&stats_address, &stats)?;

    let social = profile
        .followers_count
        .saturating_add(profile.following_count)
        .saturating_add(stats.total_likes_received);
    let insights = UserInsights {
        user: signer,
        total_listening_time: tally.listening_time,
        favorite_genre: tally.favorite_genre(&tracks),
        most_played_track: tally.most_played(),
        discovery_score: tally.discovery_score(),
        social_engagement: (social as f32 / ENGAGEMENT_SCALE).min(1.0),
        generated_at: ctx.now,
    };
    ctx.store(&insights_address, &insights)?;

    info!(
        user = %signer.short(),
        plays = tally.plays,
        genre = %insights.favorite_genre,
        "User insights generated"
    );
    Ok(())
}
