//! Parsing and formatting helpers for the CLI.

mod parsing;

pub use parsing::{format_timestamp, parse_permissions, parse_pubkey, parse_timestamp};
