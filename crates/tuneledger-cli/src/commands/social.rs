use chrono::Utc;

use tuneledger_core::instruction::RecordActivity;
use tuneledger_core::state::ActivityType;

use crate::app::AppContext;
use crate::cli::{ActivityArgs, FollowArgs};
use crate::helpers::{parse_pubkey, parse_timestamp};

use super::report;

pub fn handle_follow(ctx: &AppContext, args: &FollowArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let following = parse_pubkey("user", &args.user)?;
    let follower = client.pubkey();
    let ix = client.builder().follow_user(&follower, &following)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Following",
        &confirmation,
        &[("User", following.to_string())],
    )
}

pub fn handle_unfollow(ctx: &AppContext, args: &FollowArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let following = parse_pubkey("user", &args.user)?;
    let follower = client.pubkey();
    let ix = client.builder().unfollow_user(&follower, &following)?;
    let confirmation = client.send(ix)?;
    report(
        ctx,
        "Unfollowed",
        &confirmation,
        &[("User", following.to_string())],
    )
}

pub fn handle_activity(ctx: &AppContext, args: &ActivityArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let kind = ActivityType::from(args.kind);
    let timestamp = match args.at.as_deref() {
        Some(at) => parse_timestamp(at)?,
        None => Utc::now().timestamp(),
    };
    let payload = RecordActivity {
        activity_type: kind.as_u8(),
        target: parse_pubkey("target", &args.target)?,
        metadata: args.metadata.clone(),
        timestamp,
    };
    let user = client.pubkey();
    let ix = client.builder().record_activity(&user, payload)?;
    let confirmation = client.send(ix)?;

    let address = client.builder().addresses().activity_feed(&user, timestamp)?;
    report(
        ctx,
        "Activity recorded",
        &confirmation,
        &[
            ("Activity", kind.label().to_string()),
            ("Address", address.to_string()),
        ],
    )
}
