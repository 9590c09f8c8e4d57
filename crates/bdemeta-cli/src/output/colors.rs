//! Terminal color support detection and formatting.
//!
//! Colors are used only when the target stream is a terminal and the
//! `NO_COLOR` environment variable is unset.

use std::env;
use std::io::{self, IsTerminal};

/// Output stream a color decision is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Color support detection and formatting
#[derive(Debug, Clone, Copy)]
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Detect color support for `stream`
    pub fn detect(stream: Stream) -> Self {
        let is_terminal = match stream {
            Stream::Stdout => io::stdout().is_terminal(),
            Stream::Stderr => io::stderr().is_terminal(),
        };
        Self {
            enabled: Self::allowed(env::var_os("NO_COLOR").is_some(), is_terminal),
        }
    }

    /// Force disable colors
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn allowed(no_color: bool, is_terminal: bool) -> bool {
        !no_color && is_terminal
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    /// Format text as dim/gray
    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_wins() {
        assert!(!ColorSupport::allowed(true, true));
        assert!(!ColorSupport::allowed(false, false));
        assert!(ColorSupport::allowed(false, true));
    }

    #[test]
    fn test_disabled_is_plain() {
        let colors = ColorSupport::disabled();
        assert_eq!(colors.red("error"), "error");
        assert_eq!(colors.bold("bsl"), "bsl");
    }

    #[test]
    fn test_enabled_wraps_in_escape_codes() {
        let colors = ColorSupport { enabled: true };
        assert_eq!(colors.red("x"), "\x1b[31mx\x1b[0m");
        assert!(colors.is_enabled());
    }
}
