//! Input handling: raw host events, pointer normalization, pinch
//! recognition, and the gesture classifier that turns pointer streams into
//! taps, drags, and double taps.

/// Raw and canonical input event types.
pub mod event;
/// Tap / drag / double-tap classification.
pub mod gesture;
/// Bindable viewer actions.
pub mod keyboard;
/// Mouse/touch unification and listener lifetime.
pub mod normalizer;
/// Two-finger pinch scale recognition.
pub mod pinch;
/// Normalizer + classifier pipeline.
pub mod processor;

pub use event::{
    MouseButton, PointerEvent, PointerSource, PointerState, RawInput,
};
pub use gesture::{ClassifierPhase, Gesture, GestureClassifier, GestureSession};
pub use keyboard::UiAction;
pub use normalizer::{AlwaysAttached, InputSurface, PointerEventNormalizer};
pub use pinch::PinchRecognizer;
pub use processor::InputProcessor;
