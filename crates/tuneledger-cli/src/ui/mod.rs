//! Terminal output for the CLI.
//!
//! `context` and `mode` inspect the terminal, `theme` holds markers and
//! tones, `render` builds the actual lines.

mod context;
mod mode;
mod render;
mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, receipt, simple_table, Column,
};
pub use theme::Badge;
