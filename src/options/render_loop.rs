use serde::{Deserialize, Serialize};
use web_time::Duration;

/// ~16.7 ms, one display refresh at 60 Hz.
const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Render loop pacing and capture settings.
pub struct RenderLoopOptions {
    /// Frame interval used when the host has no animation-frame primitive,
    /// in milliseconds.
    pub fallback_frame_interval_ms: f64,
    /// File name handed to the capture collaborator.
    pub screenshot_file_name: String,
    /// Pause rendering while the host window is unfocused.
    pub pause_on_blur: bool,
}

impl RenderLoopOptions {
    /// Fallback frame interval as a [`Duration`]. Out-of-range values fall
    /// back to 60 Hz.
    #[must_use]
    pub fn fallback_frame_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.fallback_frame_interval_ms / 1000.0)
            .unwrap_or(DEFAULT_FRAME_INTERVAL)
    }
}

impl Default for RenderLoopOptions {
    fn default() -> Self {
        Self {
            fallback_frame_interval_ms: 1000.0 / 60.0,
            screenshot_file_name: "screenshot.png".into(),
            pause_on_blur: true,
        }
    }
}
