//! Everything a renderer needs to know about the terminal.

use super::mode::{OutputMode, Terminal};

const FALLBACK_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    /// Columns available for tables
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Read the terminal state once per command.
    ///
    /// `NO_COLOR` only turns off color; layout still follows the terminal.
    pub fn from_env(json_flag: bool) -> Self {
        let terminal = Terminal::detect();
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::for_terminal(json_flag, terminal, no_color, columns())
    }

    fn for_terminal(json_flag: bool, terminal: Terminal, no_color: bool, width: Option<usize>) -> Self {
        Self {
            color: terminal.styled() && !no_color,
            unicode: !terminal.dumb,
            width: width.unwrap_or(FALLBACK_WIDTH),
            mode: OutputMode::select(json_flag, terminal),
        }
    }
}

fn columns() -> Option<usize> {
    let raw = std::env::var("COLUMNS").ok()?;
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_keeps_pretty_layout() {
        let terminal = Terminal { interactive: true, dumb: false };
        let ui = UiContext::for_terminal(false, terminal, true, Some(120));
        assert!(!ui.color);
        assert!(ui.unicode);
        assert_eq!(ui.mode, OutputMode::Pretty);
        assert_eq!(ui.width, 120);
    }

    #[test]
    fn test_dumb_terminal_is_ascii_plain() {
        let terminal = Terminal { interactive: true, dumb: true };
        let ui = UiContext::for_terminal(false, terminal, false, None);
        assert!(!ui.color);
        assert!(!ui.unicode);
        assert_eq!(ui.mode, OutputMode::Plain);
        assert_eq!(ui.width, FALLBACK_WIDTH);
    }
}
