//! Application-level utilities for the TuneLedger CLI.
//!
//! This module provides:
//! - Path resolution for config, ledger and key files
//! - Key file reading and writing
//! - The per-invocation [`AppContext`]

mod context;
mod keyfile;
mod resolver;

pub use context::{AppContext, LocalClient};
pub use keyfile::{read_keypair, write_keypair};
pub use resolver::{parse_program_id, resolve_config_path};
