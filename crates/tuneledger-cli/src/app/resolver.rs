//! Path resolution for config, ledger and key files.

use std::path::{Path, PathBuf};

use tuneledger_core::{Pubkey, DEFAULT_PROGRAM_ID};

use crate::cli::Cli;
use crate::config::{default_config_path, default_keypair_path, read_config, TuneLedgerConfig};
use crate::errors::CliError;

/// Resolve the config file path, checking TUNELEDGER_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("TUNELEDGER_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file if one exists.
pub fn load_config() -> anyhow::Result<Option<TuneLedgerConfig>> {
    let path = resolve_config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    read_config(&path).map(Some)
}

/// Resolve the ledger path from CLI args or config.
pub fn resolve_ledger_path(cli: &Cli, config: Option<&TuneLedgerConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.ledger.as_deref() {
        return Ok(PathBuf::from(path));
    }
    match config {
        Some(config) => Ok(PathBuf::from(&config.ledger.path)),
        None => Err(CliError::not_found(
            missing_config_message(&resolve_config_path()?),
            "Hint: Run `tuneledger init`, or set TUNELEDGER_PATH.",
        )
        .into()),
    }
}

/// Resolve the key file path from CLI args, config, or the default location.
pub fn resolve_keypair_path(cli: &Cli, config: Option<&TuneLedgerConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.keypair.as_deref() {
        return Ok(PathBuf::from(path));
    }
    match config {
        Some(config) => Ok(PathBuf::from(&config.signer.keypair_path)),
        None => default_keypair_path(),
    }
}

/// Program id from config, or the built-in id.
pub fn resolve_program_id(config: Option<&TuneLedgerConfig>) -> anyhow::Result<Pubkey> {
    match config.and_then(|c| c.ledger.program_id.as_deref()) {
        Some(hex) => parse_program_id(hex),
        None => Ok(DEFAULT_PROGRAM_ID),
    }
}

pub fn parse_program_id(hex: &str) -> anyhow::Result<Pubkey> {
    hex.parse::<Pubkey>().map_err(|e| {
        anyhow::Error::from(CliError::invalid_input(format!(
            "Invalid program id {:?}: {}",
            hex, e
        )))
    })
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("No config found at {}", config_path.display())
}

/// Error message when the ledger file is missing.
pub fn missing_ledger_message(path: &Path) -> String {
    format!("No ledger found at {}", path.display())
}
