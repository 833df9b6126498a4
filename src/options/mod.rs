//! Interaction options with TOML support.
//!
//! Gesture timing, zoom normalization, render-loop pacing, and keybindings
//! are consolidated here. Options are read from TOML; they are never
//! written back.

mod gesture;
mod keybindings;
mod render_loop;
mod zoom;

use std::path::Path;

pub use gesture::GestureOptions;
pub use keybindings::KeybindingOptions;
pub use render_loop::RenderLoopOptions;
use serde::{Deserialize, Serialize};
pub use zoom::ZoomOptions;

use crate::error::GlanceError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[gesture]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Tap and double-tap timing.
    pub gesture: GestureOptions,
    /// Wheel and pinch normalization.
    pub zoom: ZoomOptions,
    /// Render loop pacing and capture.
    pub render_loop: RenderLoopOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, GlanceError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| GlanceError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GlanceError> {
        let content = std::fs::read_to_string(path).map_err(GlanceError::Io)?;
        Self::from_toml_str(&content)
    }
}
