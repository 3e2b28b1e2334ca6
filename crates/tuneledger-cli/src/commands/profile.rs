use tuneledger_core::instruction::{CreateUserProfile, UpdateUserProfile};
use tuneledger_core::state::{UserProfile, UserStats};
use tuneledger_core::AnyRecord;

use crate::app::AppContext;
use crate::cli::{ProfileCreateArgs, ProfileUpdateArgs, UserShowArgs};
use crate::helpers::parse_pubkey;
use crate::output::{print_json, print_record, record_json};
use crate::ui::blank_line;

use super::{explain_duplicate, fetch_required, report};

pub fn handle_create(ctx: &AppContext, args: &ProfileCreateArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let mut payload = CreateUserProfile::new(args.username.as_str());
    if let Some(display_name) = &args.display_name {
        payload = payload.with_display_name(display_name.as_str());
    }
    if let Some(bio) = &args.bio {
        payload = payload.with_bio(bio.as_str());
    }
    if let Some(image) = &args.profile_image {
        payload = payload.with_profile_image(image.as_str());
    }
    let user = client.pubkey();
    let ix = client.builder().create_user_profile(&user, payload)?;
    let confirmation = client.send(ix).map_err(|err| {
        explain_duplicate(
            err,
            format!("{} already has a profile", user.short()),
            "Use `tuneledger profile update` to change it.",
        )
    })?;

    let address = client.builder().addresses().user_profile(&user)?;
    report(
        ctx,
        "Profile created",
        &confirmation,
        &[
            ("Username", args.username.clone()),
            ("Address", address.to_string()),
        ],
    )
}

pub fn handle_update(ctx: &AppContext, args: &ProfileUpdateArgs) -> anyhow::Result<()> {
    let mut client = ctx.client()?;
    let user = client.pubkey();
    let payload = UpdateUserProfile {
        display_name: args.display_name.clone(),
        bio: args.bio.clone(),
        profile_image: args.profile_image.clone(),
    };
    let ix = client.builder().update_user_profile(&user, payload)?;
    let confirmation = client.send(ix)?;
    report(ctx, "Profile updated", &confirmation, &[])
}

/// Show a profile and its stats record.
pub fn handle_show(ctx: &AppContext, args: &UserShowArgs) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let user = match args.user.as_deref() {
        Some(user) => parse_pubkey("user", user)?,
        None => client.pubkey(),
    };
    let book = client.builder().addresses();
    let profile_address = book.user_profile(&user)?;
    let stats_address = book.user_stats(&user)?;

    let profile: UserProfile = fetch_required(
        &client,
        &profile_address,
        "profile",
        "Run `tuneledger profile create <USERNAME>` first.",
    )?;
    let stats = client.fetch::<UserStats>(&stats_address)?;

    let ui = ctx.ui();
    let profile = AnyRecord::from(profile);
    let stats = stats.map(AnyRecord::from);
    if ui.mode.is_json() {
        let mut value = serde_json::json!({
            "profile": record_json(&profile_address, &profile)?,
        });
        if let Some(stats) = &stats {
            value["stats"] = record_json(&stats_address, stats)?;
        }
        return print_json(&value);
    }
    print_record(&ui, &profile_address, &profile)?;
    if let Some(stats) = &stats {
        blank_line(&ui);
        print_record(&ui, &stats_address, stats)?;
    }
    Ok(())
}
