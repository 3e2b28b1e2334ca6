//! Application context for the TuneLedger CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config file and opens the
//! ledger, key file and client on demand.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use tuneledger_core::{
    AddressBook, Client, InstructionBuilder, Keypair, Ledger, LocalTransport, Pubkey, SqliteStore,
};

use crate::cli::Cli;
use crate::config::TuneLedgerConfig;
use crate::errors::CliError;
use crate::ui::UiContext;

use super::keyfile::read_keypair;
use super::resolver::{
    load_config, missing_ledger_message, resolve_keypair_path, resolve_ledger_path,
    resolve_program_id,
};

/// Client that applies instructions to the local ledger file.
pub type LocalClient = Client<LocalTransport<SqliteStore>, Keypair>;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<TuneLedgerConfig>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn ui(&self) -> UiContext {
        UiContext::from_env(self.cli.json)
    }

    /// The config file, loaded on first use; `None` when there is none.
    pub fn config(&self) -> anyhow::Result<Option<&TuneLedgerConfig>> {
        Ok(self.config.get_or_try_init(load_config)?.as_ref())
    }

    pub fn ledger_path(&self) -> anyhow::Result<PathBuf> {
        resolve_ledger_path(self.cli, self.config()?)
    }

    pub fn keypair_path(&self) -> anyhow::Result<PathBuf> {
        resolve_keypair_path(self.cli, self.config()?)
    }

    pub fn program_id(&self) -> anyhow::Result<Pubkey> {
        resolve_program_id(self.config()?)
    }

    pub fn keypair(&self) -> anyhow::Result<Keypair> {
        read_keypair(&self.keypair_path()?)
    }

    pub fn builder(&self) -> anyhow::Result<InstructionBuilder> {
        Ok(InstructionBuilder::new(AddressBook::new(self.program_id()?)))
    }

    /// Open the ledger file for reading and applying instructions.
    pub fn open_ledger(&self) -> anyhow::Result<Ledger<SqliteStore>> {
        let path = self.ledger_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_ledger_message(&path),
                "Hint: Run `tuneledger init`, or point --ledger at an existing file.",
            )
            .into());
        }
        let program_id = self.program_id()?;
        let store = SqliteStore::open(&path, &program_id)?;
        Ok(Ledger::new(store, program_id))
    }

    /// Client that signs with the configured key and applies to the ledger file.
    pub fn client(&self) -> anyhow::Result<LocalClient> {
        let ledger = self.open_ledger()?;
        let keypair = self.keypair()?;
        Ok(Client::new(
            LocalTransport::new(ledger),
            keypair,
            self.builder()?,
        ))
    }
}
