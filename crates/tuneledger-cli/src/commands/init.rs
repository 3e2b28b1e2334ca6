use std::path::PathBuf;

use tuneledger_core::{Keypair, Signer, SqliteStore, DEFAULT_PROGRAM_ID};

use crate::app::{
    parse_program_id, read_keypair, resolve_config_path, write_keypair, AppContext,
};
use crate::cli::InitArgs;
use crate::config::{default_keypair_path, default_ledger_path, write_config, TuneLedgerConfig};
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::{hint, print, receipt};

/// Create the config (unless one exists), a key file (unless one exists)
/// and an empty ledger file.
pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let requested = args
        .program_id
        .as_deref()
        .map(parse_program_id)
        .transpose()?;

    let config_path = resolve_config_path()?;
    let (ledger_path, keypair_path, program_id, wrote_config) = match ctx.config()? {
        Some(_) => {
            let program_id = ctx.program_id()?;
            if let Some(requested) = requested {
                if requested != program_id {
                    return Err(CliError::invalid_input(format!(
                        "Config at {} already names program {}",
                        config_path.display(),
                        program_id
                    ))
                    .into());
                }
            }
            (ctx.ledger_path()?, ctx.keypair_path()?, program_id, false)
        }
        None => {
            let cli = ctx.cli();
            let ledger_path = match cli.ledger.as_deref() {
                Some(path) => PathBuf::from(path),
                None => default_ledger_path()?,
            };
            let keypair_path = match cli.keypair.as_deref() {
                Some(path) => PathBuf::from(path),
                None => default_keypair_path()?,
            };
            let program_id = requested.unwrap_or(DEFAULT_PROGRAM_ID);
            let config = TuneLedgerConfig::new(
                &ledger_path,
                &keypair_path,
                requested.map(|id| id.to_string()),
            );
            write_config(&config_path, &config)?;
            (ledger_path, keypair_path, program_id, true)
        }
    };

    let keypair = if keypair_path.exists() {
        read_keypair(&keypair_path)?
    } else {
        let keypair = Keypair::generate();
        write_keypair(&keypair_path, &keypair, false)?;
        keypair
    };

    if ledger_path.exists() {
        return Err(CliError::invalid_input(format!(
            "Ledger already exists at {}\nHint: Pass --ledger <PATH> to create another one.",
            ledger_path.display()
        ))
        .into());
    }
    if let Some(parent) = ledger_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteStore::create(&ledger_path, &program_id)?;
    tracing::info!(path = %ledger_path.display(), "Ledger initialized");

    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "status": "ok",
            "ledger": ledger_path.display().to_string(),
            "config": config_path.display().to_string(),
            "keypair": keypair_path.display().to_string(),
            "pubkey": keypair.pubkey().to_string(),
            "program_id": program_id.to_string(),
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }
    let mut items = vec![
        ("Ledger", ledger_path.display().to_string()),
        ("Key File", keypair_path.display().to_string()),
        ("Pubkey", keypair.pubkey().to_string()),
    ];
    if wrote_config {
        items.push(("Config", config_path.display().to_string()));
    }
    print(&ui, &receipt(&ui, "Ledger initialized", &items));
    print(
        &ui,
        &hint(&ui, "Run `tuneledger profile create <USERNAME>` to get started."),
    );
    Ok(())
}
