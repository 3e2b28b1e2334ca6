//! Output formatting helpers for the CLI.
//!
//! Records print either as JSON (`--json`) or as key-value lines.

mod json;
mod text;

pub use json::{print_json, record_json};
pub use text::{print_confirmation, print_record};
