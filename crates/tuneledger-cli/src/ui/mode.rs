//! Picking between JSON, plain and styled output.

use std::io::IsTerminal;

/// How a command writes its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// A single JSON document on stdout
    Json,
    /// `key=value` lines, safe to pipe into other tools
    #[default]
    Plain,
    /// Colors, badges and aligned columns
    Pretty,
}

/// What we know about the stream the CLI writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Terminal {
    pub interactive: bool,
    pub dumb: bool,
}

impl Terminal {
    pub fn detect() -> Self {
        Self {
            interactive: std::io::stdout().is_terminal(),
            dumb: std::env::var_os("TERM").is_some_and(|term| term == "dumb"),
        }
    }

    /// Styling needs an interactive terminal that understands escapes.
    pub fn styled(self) -> bool {
        self.interactive && !self.dumb
    }
}

impl OutputMode {
    /// `--json` always wins; otherwise the terminal decides.
    pub fn select(json_flag: bool, terminal: Terminal) -> Self {
        match (json_flag, terminal.styled()) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }

    pub fn is_pretty(&self) -> bool {
        *self == Self::Pretty
    }
}
