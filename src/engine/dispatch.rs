//! Gesture → command translation.
//!
//! Stateless apart from configuration: every gesture maps to at most one
//! [`ViewerCommand`], and zoom magnitudes are normalized here so raw
//! platform deltas never reach the camera.

use super::command::ViewerCommand;
use crate::input::Gesture;
use crate::options::ZoomOptions;

/// Zoom direction for a raw wheel delta: the delta clamped to `[-1, 1]`
/// and snapped to a whole step, so the result is always `-1`, `0` or `1`.
#[must_use]
pub fn wheel_direction(raw: f32) -> f32 {
    if raw > 0.0 {
        1.0
    } else if raw < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Zoom direction for a pinch scale: sign only, `-1` when the fingers moved
/// together. Non-finite scales yield `None`.
#[must_use]
pub fn pinch_direction(scale: f32) -> Option<f32> {
    if !scale.is_finite() {
        return None;
    }
    Some(if scale < 1.0 { -1.0 } else { 1.0 })
}

/// Maps gestures to commands.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    invert_wheel: bool,
    ignore_zero_delta: bool,
}

impl CommandDispatcher {
    /// Create a dispatcher with the given zoom normalization.
    #[must_use]
    pub fn new(options: &ZoomOptions) -> Self {
        Self {
            invert_wheel: options.invert_wheel,
            ignore_zero_delta: options.ignore_zero_delta,
        }
    }

    /// The command for a gesture, if any.
    #[must_use]
    pub fn translate(&self, gesture: Gesture) -> Option<ViewerCommand> {
        match gesture {
            Gesture::Drag { delta } => Some(ViewerCommand::Pan { delta }),
            Gesture::Tap { position } => Some(ViewerCommand::Click { position }),
            Gesture::DoubleTap => Some(ViewerCommand::ToggleUi { show: None }),
            Gesture::WheelZoom { raw } => {
                let mut direction = wheel_direction(raw);
                if self.invert_wheel {
                    direction = -direction;
                }
                if direction == 0.0 && self.ignore_zero_delta {
                    return None;
                }
                Some(ViewerCommand::Zoom { direction })
            }
            Gesture::PinchZoom { scale } => pinch_direction(scale)
                .map(|direction| ViewerCommand::Zoom { direction }),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(&ZoomOptions::default())
    }

    fn zoom_of(gesture: Gesture) -> Option<f32> {
        match dispatcher().translate(gesture) {
            Some(ViewerCommand::Zoom { direction }) => Some(direction),
            _ => None,
        }
    }

    #[test]
    fn wheel_and_pinch_scenarios() {
        assert_eq!(zoom_of(Gesture::WheelZoom { raw: 850.0 }), Some(1.0));
        assert_eq!(zoom_of(Gesture::WheelZoom { raw: -3.0 }), Some(-1.0));
        assert_eq!(zoom_of(Gesture::PinchZoom { scale: 0.8 }), Some(-1.0));
        assert_eq!(zoom_of(Gesture::PinchZoom { scale: 1.3 }), Some(1.0));
    }

    #[test]
    fn wheel_direction_is_always_a_whole_step() {
        for raw in [
            -1.0e9, -120.0, -3.0, -0.25, -f32::MIN_POSITIVE, 0.0, 0.01, 1.0,
            53.0, 1.0e9, f32::INFINITY, f32::NEG_INFINITY, f32::NAN,
        ] {
            let d = wheel_direction(raw);
            assert!(d == -1.0 || d == 0.0 || d == 1.0, "{raw} -> {d}");
        }
    }

    #[test]
    fn pinch_at_exactly_one_zooms_in() {
        assert_eq!(pinch_direction(1.0), Some(1.0));
        assert_eq!(pinch_direction(f32::NAN), None);
    }

    #[test]
    fn zero_wheel_delta_is_dropped_by_default() {
        assert_eq!(dispatcher().translate(Gesture::WheelZoom { raw: 0.0 }), None);

        let keep_zero = CommandDispatcher::new(&ZoomOptions {
            ignore_zero_delta: false,
            ..ZoomOptions::default()
        });
        assert_eq!(
            keep_zero.translate(Gesture::WheelZoom { raw: 0.0 }),
            Some(ViewerCommand::Zoom { direction: 0.0 })
        );
    }

    #[test]
    fn inverted_wheel_flips_sign() {
        let inverted = CommandDispatcher::new(&ZoomOptions {
            invert_wheel: true,
            ..ZoomOptions::default()
        });
        assert_eq!(
            inverted.translate(Gesture::WheelZoom { raw: 120.0 }),
            Some(ViewerCommand::Zoom { direction: -1.0 })
        );
    }

    #[test]
    fn double_tap_toggles_ui_instead_of_camera() {
        assert_eq!(
            dispatcher().translate(Gesture::DoubleTap),
            Some(ViewerCommand::ToggleUi { show: None })
        );
    }

    #[test]
    fn drag_becomes_pan_with_same_delta() {
        let delta = Vec2::new(-2.0, 4.0);
        assert_eq!(
            dispatcher().translate(Gesture::Drag { delta }),
            Some(ViewerCommand::Pan { delta })
        );
    }
}
