use tracing::info;

use crate::engine::context::Context;
use crate::error::{Result, TuneLedgerError};
use crate::instruction::{CreateUserProfile, UpdateUserProfile};
use crate::state::UserProfile;

pub(crate) fn create(ctx: &mut Context<'_>, args: CreateUserProfile) -> Result<()> {
    ctx.expect_len(3)?;
    let signer = ctx.signer;
    let profile = ctx.expect(0, "user profile", &ctx.book.user_profile(&signer)?, true)?;
    let stats = ctx.expect(1, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    ctx.expect_signer(2, "authority")?;

    let record = UserProfile {
        authority: signer,
        username: args.username,
        display_name: args.display_name,
        bio: args.bio,
        profile_image: args.profile_image,
        followers_count: 0,
        following_count: 0,
        created_at: ctx.now,
    };
    ctx.init(&profile, &record)?;
    ctx.touch(&stats)?;

    info!(username = %record.username, authority = %signer.short(), "User profile created");
    Ok(())
}

pub(crate) fn update(ctx: &mut Context<'_>, args: UpdateUserProfile) -> Result<()> {
    ctx.expect_len(3)?;
    let signer = ctx.signer;
    let address = ctx.account(0, "user profile")?.pubkey;
    let mut profile = ctx.require::<UserProfile>(&address)?;
    if profile.authority != signer {
        return Err(TuneLedgerError::Unauthorized(format!(
            "profile {} belongs to {}",
            profile.username,
            profile.authority.short()
        )));
    }
    ctx.expect(0, "user profile", &ctx.book.user_profile(&signer)?, true)?;
    let stats = ctx.expect(1, "user stats", &ctx.book.user_stats(&signer)?, true)?;
    ctx.expect_signer(2, "authority")?;

    if let Some(display_name) = args.display_name {
        profile.display_name = display_name;
    }
    if let Some(bio) = args.bio {
        profile.bio = bio;
    }
    if let Some(profile_image) = args.profile_image {
        profile.profile_image = profile_image;
    }
    ctx.store(&address, &profile)?;
    ctx.touch(&stats)?;

    info!(username = %profile.username, "User profile updated");
    Ok(())
}
