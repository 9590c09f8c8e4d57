//! Terminal output formatting and utilities.
//!
//! Command results go to stdout; warnings and errors go to stderr.

pub mod colors;
pub mod errors;

use colors::{ColorSupport, Stream};
use errors::ErrorFormatter;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: ColorSupport,
    errors: ErrorFormatter,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(Stream::Stdout),
            errors: ErrorFormatter::new(),
        }
    }

    /// Colors for text written to stdout
    pub fn colors(&self) -> &ColorSupport {
        &self.colors
    }

    /// Print command output as is
    pub fn emit(&self, text: &str) {
        if text.ends_with('\n') {
            print!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{}", self.errors.format_warning(message));
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
