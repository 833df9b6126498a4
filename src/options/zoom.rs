use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Wheel and pinch zoom normalization.
pub struct ZoomOptions {
    /// Flip the wheel direction.
    pub invert_wheel: bool,
    /// Drop zero wheel deltas instead of dispatching a zero zoom.
    pub ignore_zero_delta: bool,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            invert_wheel: false,
            ignore_zero_delta: true,
        }
    }
}
