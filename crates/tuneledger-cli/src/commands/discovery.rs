//! Search entries, recommendations and listening insights.

use std::collections::BTreeSet;

use tuneledger_core::instruction::{CreateRecommendation, CreateSearchIndex};
use tuneledger_core::state::{TargetType, TrackPlay, UserInsights};
use tuneledger_core::{AnyRecord, Pubkey, Record, RecordKind, RecordStore};

use crate::app::{AppContext, LocalClient};
use crate::cli::{RecommendCreateArgs, RecommendViewArgs, SearchIndexArgs};
use crate::helpers::parse_pubkey;
use crate::output::print_record;

use super::{fetch_required, report};

pub fn handle_search_index(ctx: &AppContext, args: &SearchIndexArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let target_type = TargetType::from(args.kind).as_u8();
    let payload = CreateSearchIndex {
        search_term: args.term.clone(),
        target_type,
        target: parse_pubkey("target", &args.target)?,
    };
    let authority = client.pubkey();
    let ix = client.builder().create_search_index(&authority, payload)?;
    let confirmation = client.send(ix)?;

    let address = client
        .builder()
        .addresses()
        .search_index(&args.term, target_type)?;
    report(
        ctx,
        "Search term indexed",
        &confirmation,
        &[("Address", address.to_string())],
    )
}

pub fn handle_recommend_create(ctx: &AppContext, args: &RecommendCreateArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let recommendation_type = TargetType::from(args.kind).as_u8();
    let target = parse_pubkey("target", &args.target)?;
    let payload = CreateRecommendation {
        recommendation_type,
        target,
        score: args.score,
        reason: args.reason.clone(),
    };
    let user = client.pubkey();
    let ix = client.builder().create_recommendation(&user, payload)?;
    let confirmation = client.send(ix)?;

    let address = client
        .builder()
        .addresses()
        .recommendation(&user, &target, recommendation_type)?;
    report(
        ctx,
        "Recommendation stored",
        &confirmation,
        &[("Address", address.to_string())],
    )
}

pub fn handle_recommend_view(ctx: &AppContext, args: &RecommendViewArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let target = parse_pubkey("target", &args.target)?;
    let user = client.pubkey();
    let ix = client.builder().mark_recommendation_viewed(
        &user,
        &target,
        TargetType::from(args.kind).as_u8(),
    )?;
    let confirmation = client.send(ix)?;
    report(ctx, "Recommendation viewed", &confirmation, &[])
}

/// The signer's plays in the local ledger, plus the tracks they reference.
fn listening_history(client: &LocalClient) -> anyhow::Result<(Vec<Pubkey>, Vec<Pubkey>)> {
    let user = client.pubkey();
    let store = client.transport().ledger().store();
    let mut plays = Vec::new();
    let mut tracks = BTreeSet::new();
    for (address, bytes) in store.scan(&RecordKind::TrackPlay.discriminator())? {
        let play = TrackPlay::unpack(&bytes)?;
        if play.user == user {
            plays.push(address);
            tracks.insert(play.track);
        }
    }
    Ok((plays, tracks.into_iter().collect()))
}

/// Recompute the signer's insights from every play recorded in the ledger.
pub fn handle_insights(ctx: &AppContext) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let (plays, tracks) = listening_history(&client)?;
    tracing::debug!(plays = plays.len(), tracks = tracks.len(), "Collected listening history");

    let user = client.pubkey();
    let ix = client
        .builder()
        .generate_user_insights(&user, &plays, &tracks)?;
    client.send(ix)?;

    let address = client.builder().addresses().user_insights(&user)?;
    let insights: UserInsights = fetch_required(
        &client,
        &address,
        "insights",
        "Run `tuneledger profile create <USERNAME>` first.",
    )?;
    if ctx.quiet() && !ctx.ui().mode.is_json() {
        return Ok(());
    }
    print_record(&ctx.ui(), &address, &AnyRecord::from(insights))
}
