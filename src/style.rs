//! Terminal text styling.
//!
//! Styling is a pure function of the text and a [`Style`]; nothing global is
//! mutated, so formatted strings can be built and tested anywhere.

use colored::{Color, Colorize};

/// Colors used by the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Progress counters, confirmations and defaults.
    Green,
    /// Errors, usernames and opt-in prompts.
    LightRed,
    /// The passphrase prompt and the "new songs only" toggle.
    LightYellow,
    /// Skipped items and cutoff date hints.
    Blue,
    /// Everything about playlists.
    LightPink,
    /// Everything about liked songs.
    LightCyan,
}

impl Style {
    fn color(self) -> Color {
        match self {
            Style::Green => Color::Green,
            Style::LightRed => Color::BrightRed,
            Style::LightYellow => Color::BrightYellow,
            Style::Blue => Color::BrightBlue,
            Style::LightPink => Color::BrightMagenta,
            Style::LightCyan => Color::BrightCyan,
        }
    }
}

/// Returns `text` decorated for the terminal in the given style.
pub fn paint(text: &str, style: Style) -> String {
    text.color(style.color()).to_string()
}

/// Turns on ANSI handling for consoles that need it switched on.
pub fn enable_terminal_colors() {
    #[cfg(windows)]
    {
        let _ = colored::control::set_virtual_terminal(true);
    }
}
