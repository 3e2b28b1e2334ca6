//! Offline address derivation.

use tuneledger_core::AddressBook;

use crate::app::AppContext;
use crate::cli::{AddressArgs, AddressSubcommand};
use crate::helpers::parse_pubkey;
use crate::output::print_json;
use crate::ui::print;

pub fn handle_address(ctx: &AppContext, args: &AddressArgs) -> anyhow::Result<()> {
    let book = AddressBook::new(ctx.program_id()?);
    let (kind, address) = derive(&book, &args.command)?;

    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "kind": kind,
            "address": address.to_string(),
        }));
    }
    print(&ui, &address.to_string());
    Ok(())
}

fn derive(
    book: &AddressBook,
    command: &AddressSubcommand,
) -> anyhow::Result<(&'static str, tuneledger_core::Pubkey)> {
    Ok(match command {
        AddressSubcommand::Profile { user } => {
            ("user_profile", book.user_profile(&parse_pubkey("user", user)?)?)
        }
        AddressSubcommand::Stats { user } => {
            ("user_stats", book.user_stats(&parse_pubkey("user", user)?)?)
        }
        AddressSubcommand::Track { title, artist } => ("track", book.track(title, artist)?),
        AddressSubcommand::Playlist { owner, name } => {
            ("playlist", book.playlist(&parse_pubkey("owner", owner)?, name)?)
        }
        AddressSubcommand::Follow {
            follower,
            following,
        } => {
            let follower = parse_pubkey("follower", follower)?;
            let following = book.user_profile(&parse_pubkey("following", following)?)?;
            ("user_follow", book.user_follow(&follower, &following)?)
        }
        AddressSubcommand::Insights { user } => {
            ("user_insights", book.user_insights(&parse_pubkey("user", user)?)?)
        }
    })
}
