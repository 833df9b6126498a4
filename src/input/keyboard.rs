use serde::{Deserialize, Serialize};

/// Viewer actions reachable from UI buttons and key presses.
///
/// Serde serializes as `snake_case` strings so TOML options stay readable:
/// ```toml
/// [keybindings.bindings]
/// screenshot = "KeyP"
/// toggle_ui = "KeyH"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiAction {
    /// Show or hide the UI chrome.
    ToggleUi,
    /// Capture the next frame.
    Screenshot,
    /// Open the share dialog.
    Share,
    /// Save the current model.
    Save,
    /// Load a model.
    Load,
    /// Reset the view to its initial state.
    Reset,
    /// Advance to the next model.
    NextModel,
}
