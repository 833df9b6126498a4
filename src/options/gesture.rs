use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Tap and double-tap timing.
pub struct GestureOptions {
    /// Window after a drag-free release in which a second release counts
    /// as a double tap, in milliseconds.
    pub double_tap_window_ms: u64,
    /// Rely on the host's native double-click event for mouse input
    /// instead of synthesizing one from two clicks.
    pub native_double_click: bool,
}

impl GestureOptions {
    /// Double-tap window as a [`Duration`].
    #[must_use]
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            double_tap_window_ms: 300,
            native_double_click: false,
        }
    }
}
