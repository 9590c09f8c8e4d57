//! Error message formatting with actionable suggestions.
//!
//! Provides user-friendly error formatting that includes the error, the edges
//! of a dependency cycle, a suggestion for a fix and the chain of causes.

use std::error::Error;

use bdemeta_core::error::BdeError;

use super::colors::{ColorSupport, Stream};

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter for stderr
    pub fn new() -> Self {
        Self::with_colors(ColorSupport::detect(Stream::Stderr))
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &BdeError) -> String {
        let mut output = String::new();

        // Main error message
        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let Some(cycle) = error.cycle() {
            for edge in cycle.windows(2) {
                output.push_str(&format!(
                    "  {} {} depends on {}\n",
                    self.colors.dim("-->"),
                    edge[0],
                    edge[1]
                ));
            }
        }

        // Add suggestion if available
        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        // Add source chain if available
        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    /// Format a warning message
    pub fn format_warning(&self, message: &str) -> String {
        format!("{}: {}", self.colors.yellow("warning"), message)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
