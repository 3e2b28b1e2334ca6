use tracing::info;

use crate::engine::context::Context;
use crate::engine::{decrement, increment};
use crate::error::{Result, TuneLedgerError};
use crate::instruction::RecordActivity;
use crate::pubkey::Pubkey;
use crate::state::{ActivityFeed, UserFollow, UserProfile};
use crate::validation;

struct FollowAccounts {
    follower_address: Pubkey,
    follower: UserProfile,
    following_address: Pubkey,
    following: UserProfile,
    edge: Pubkey,
}

fn follow_accounts(ctx: &Context<'_>) -> Result<FollowAccounts> {
    ctx.expect_len(4)?;
    let signer = ctx.signer;

    let following_address = ctx.account(1, "following profile")?.pubkey;
    let following = ctx.require::<UserProfile>(&following_address)?;
    ctx.expect(
        1,
        "following profile",
        &ctx.book.user_profile(&following.authority)?,
        true,
    )?;
    validation::distinct("follow", &signer, &following.authority)?;

    let follower_address = ctx.expect(0, "follower profile", &ctx.book.user_profile(&signer)?, true)?;
    let follower = ctx.require::<UserProfile>(&follower_address)?;
    let edge = ctx.expect(
        2,
        "user follow",
        &ctx.book.user_follow(&signer, &following_address)?,
        true,
    )?;
    ctx.expect_signer(3, "follower")?;

    Ok(FollowAccounts {
        follower_address,
        follower,
        following_address,
        following,
        edge,
    })
}

pub(crate) fn follow(ctx: &mut Context<'_>) -> Result<()> {
    let FollowAccounts {
        follower_address,
        mut follower,
        following_address,
        mut following,
        edge,
    } = follow_accounts(ctx)?;

    if ctx.exists(&edge)? {
        return Err(TuneLedgerError::AlreadyExists(format!(
            "{} already follows {}",
            follower.username, following.username
        )));
    }
    ctx.init(
        &edge,
        &UserFollow {
            follower: ctx.signer,
            following: following_address,
            created_at: ctx.now,
        },
    )?;

    follower.following_count = increment(follower.following_count, "following")?;
    following.followers_count = increment(following.followers_count, "followers")?;
    ctx.store(&follower_address, &follower)?;
    ctx.store(&following_address, &following)?;

    info!(follower = %follower.username, following = %following.username, "User followed");
    Ok(())
}

pub(crate) fn unfollow(ctx: &mut Context<'_>) -> Result<()> {
    let FollowAccounts {
        follower_address,
        mut follower,
        following_address,
        mut following,
        edge,
    } = follow_accounts(ctx)?;

    if ctx.load::<UserFollow>(&edge)?.is_none() {
        return Err(TuneLedgerError::NotFound(format!(
            "{} does not follow {}",
            follower.username, following.username
        )));
    }
    ctx.close(&edge)?;

    follower.following_count = decrement(follower.following_count, "following")?;
    following.followers_count = decrement(following.followers_count, "followers")?;
    ctx.store(&follower_address, &follower)?;
    ctx.store(&following_address, &following)?;

    info!(follower = %follower.username, following = %following.username, "User unfollowed");
    Ok(())
}

pub(crate) fn record_activity(ctx: &mut Context<'_>, args: RecordActivity) -> Result<()> {
    ctx.expect_len(2)?;
    let signer = ctx.signer;
    let address = ctx.expect(
        0,
        "activity feed",
        &ctx.book.activity_feed(&signer, args.timestamp)?,
        true,
    )?;
    ctx.expect_signer(1, "user")?;

    ctx.init(
        &address,
        &ActivityFeed {
            user: signer,
            activity_type: args.activity_type,
            target: args.target,
            metadata: args.metadata,
            created_at: args.timestamp,
        },
    )?;

    info!(user = %signer.short(), activity_type = args.activity_type, "Activity recorded");
    Ok(())
}
