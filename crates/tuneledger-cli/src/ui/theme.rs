//! Status markers and text tones.

use owo_colors::{OwoColorize, Style};

/// Outcome marker shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Err,
}

impl Badge {
    pub fn marker(self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "\u{2714}",
            (Self::Ok, false) => "[ok]",
            (Self::Err, true) => "\u{2718}",
            (Self::Err, false) => "[error]",
        }
    }

    fn tone(self) -> Tone {
        match self {
            Self::Ok => Tone::Good,
            Self::Err => Tone::Bad,
        }
    }

    /// The marker, colored when the terminal allows it.
    pub fn paint(self, unicode: bool, color: bool) -> String {
        self.tone().paint(self.marker(unicode), color)
    }
}

/// Text emphasis used across the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Strong,
    Good,
    Bad,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Muted => Style::new().dimmed(),
            Self::Strong => Style::new().bold(),
            Self::Good => Style::new().green().bold(),
            Self::Bad => Style::new().red().bold(),
        }
    }

    pub fn paint(self, text: &str, color: bool) -> String {
        if !color {
            return text.to_owned();
        }
        text.style(self.style()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_fall_back_to_ascii() {
        assert_eq!(Badge::Ok.marker(false), "[ok]");
        assert_eq!(Badge::Err.marker(false), "[error]");
        assert_eq!(Badge::Ok.paint(true, false), "\u{2714}");
    }

    #[test]
    fn test_tone_only_escapes_with_color() {
        assert_eq!(Tone::Strong.paint("Road Trip", false), "Road Trip");
        let painted = Tone::Bad.paint("Road Trip", true);
        assert!(painted.starts_with('\u{1b}'));
        assert!(painted.contains("Road Trip"));
    }
}
