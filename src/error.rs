//! Crate-level error types.

use std::fmt;

/// Errors produced by the glance crate.
///
/// None of these are raised from the per-event or per-frame paths: input
/// and render failures are absorbed and logged there. These cover setup:
/// reading options and binding to a host.
#[derive(Debug)]
pub enum GlanceError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing failure.
    OptionsParse(String),
    /// Browser host binding failure (missing canvas, listener rejected).
    Host(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for GlanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Host(msg) => write!(f, "host binding error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for GlanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GlanceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
