//! The interaction layer's outbound vocabulary.
//!
//! Every classified gesture, key press, or UI button ends up as a
//! `ViewerCommand` passed to
//! [`InteractionController::execute`](super::InteractionController::execute).

use glam::Vec2;

use crate::input::UiAction;

/// A command for the scene or UI collaborators.
///
/// ```ignore
/// controller.execute(ViewerCommand::Zoom { direction: 1.0 });
/// controller.execute(ViewerCommand::Action(UiAction::Screenshot));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Pan the view by `delta` pixels since the previous sample.
    Pan {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom one step (positive = zoom in, negative = zoom out).
    Zoom {
        /// Direction in `[-1, 1]`.
        direction: f32,
    },

    // ── UI ──────────────────────────────────────────────────────────
    /// Show, hide (`Some`), or flip (`None`) the UI chrome.
    ToggleUi {
        /// Explicit visibility, or `None` to toggle.
        show: Option<bool>,
    },

    /// Single tap / click at a position.
    Click {
        /// Screen position of the press.
        position: Vec2,
    },

    /// A bindable viewer action (button or key).
    Action(UiAction),

    // ── Host ────────────────────────────────────────────────────────
    /// The viewport changed size.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}
