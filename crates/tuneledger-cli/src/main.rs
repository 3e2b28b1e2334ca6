//! TuneLedger CLI - an operator tool over a local TuneLedger ledger file
//!
//! This is the command-line interface for TuneLedger. It signs instructions
//! with a local key file and applies them to a SQLite-backed ledger.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tuneledger_core::VERSION;

use crate::app::AppContext;
use crate::cli::{
    Cli, Commands, PlaylistSubcommand, ProfileSubcommand, RecommendSubcommand, TrackSubcommand,
};
use crate::commands::{
    address, discovery, init, keygen, maintenance, misc, playlist, profile, record, social, track,
};
use crate::constants::DEFAULT_LOG_FILTER;
use crate::errors::exit_code_for;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);
    init_tracing(&ctx);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui();
        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);
        print_error(&ui_ctx, message, hint);
        std::process::exit(exit_code_for(&e));
    }
}

/// `TUNELEDGER_LOG`, then the config's `log.filter`, then `warn`.
fn init_tracing(ctx: &AppContext) {
    let fallback = ctx
        .config()
        .ok()
        .flatten()
        .map(|config| config.log.filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let filter = EnvFilter::try_from_env("TUNELEDGER_LOG")
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn split_hint(error: &str) -> (&str, Option<&str>) {
    match error.find("\nHint:") {
        Some(idx) => (&error[..idx], Some(error[idx + "\nHint:".len()..].trim_start())),
        None => (error, None),
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Keygen(args)) => {
            keygen::handle_keygen(ctx, args)?;
        }
        Some(Commands::Address(args)) => {
            address::handle_address(ctx, args)?;
        }
        Some(Commands::Profile(args)) => match &args.command {
            ProfileSubcommand::Create(create_args) => profile::handle_create(ctx, create_args)?,
            ProfileSubcommand::Update(update_args) => profile::handle_update(ctx, update_args)?,
            ProfileSubcommand::Show(show_args) => profile::handle_show(ctx, show_args)?,
        },
        Some(Commands::Track(args)) => match &args.command {
            TrackSubcommand::Create(create_args) => track::handle_create(ctx, create_args)?,
            TrackSubcommand::Show(ref_args) => track::handle_show(ctx, ref_args)?,
            TrackSubcommand::Like(ref_args) => track::handle_like(ctx, ref_args)?,
            TrackSubcommand::Unlike(ref_args) => track::handle_unlike(ctx, ref_args)?,
            TrackSubcommand::Play(play_args) => track::handle_play(ctx, play_args)?,
        },
        Some(Commands::Playlist(args)) => match &args.command {
            PlaylistSubcommand::Create(create_args) => playlist::handle_create(ctx, create_args)?,
            PlaylistSubcommand::Update(update_args) => playlist::handle_update(ctx, update_args)?,
            PlaylistSubcommand::Show(ref_args) => playlist::handle_show(ctx, ref_args)?,
            PlaylistSubcommand::AddTrack(track_args) => {
                playlist::handle_add_track(ctx, track_args)?
            }
            PlaylistSubcommand::RemoveTrack(track_args) => {
                playlist::handle_remove_track(ctx, track_args)?
            }
            PlaylistSubcommand::Like(ref_args) => playlist::handle_like(ctx, ref_args)?,
            PlaylistSubcommand::Unlike(ref_args) => playlist::handle_unlike(ctx, ref_args)?,
            PlaylistSubcommand::AddCollaborator(collaborator_args) => {
                playlist::handle_add_collaborator(ctx, collaborator_args)?
            }
        },
        Some(Commands::Follow(args)) => {
            social::handle_follow(ctx, args)?;
        }
        Some(Commands::Unfollow(args)) => {
            social::handle_unfollow(ctx, args)?;
        }
        Some(Commands::Activity(args)) => {
            social::handle_activity(ctx, args)?;
        }
        Some(Commands::SearchIndex(args)) => {
            discovery::handle_search_index(ctx, args)?;
        }
        Some(Commands::Recommend(args)) => match &args.command {
            RecommendSubcommand::Create(create_args) => {
                discovery::handle_recommend_create(ctx, create_args)?
            }
            RecommendSubcommand::View(view_args) => {
                discovery::handle_recommend_view(ctx, view_args)?
            }
        },
        Some(Commands::Insights) => {
            discovery::handle_insights(ctx)?;
        }
        Some(Commands::Record(args)) => {
            record::handle_record(ctx, args)?;
        }
        Some(Commands::Check) => {
            maintenance::handle_check(ctx)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            if !cli.quiet {
                println!("TuneLedger v{}", VERSION);
                println!("Run `tuneledger init` to create a ledger and key file.");
                println!("Run `tuneledger --help` for all commands.");
            }
        }
    }

    Ok(())
}
