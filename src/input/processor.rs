//! Converts raw host input into classified gestures.
//!
//! The `InputProcessor` owns all transient input state (tracked pointer,
//! listener attachment, gesture session, tap timer). It is the only thing
//! that sits between raw host events and command dispatch.

use web_time::Instant;

use super::event::RawInput;
use super::gesture::{ClassifierPhase, Gesture, GestureClassifier};
use super::normalizer::{InputSurface, PointerEventNormalizer};
use crate::options::GestureOptions;

/// Normalizer and classifier chained together.
///
/// # Usage
///
/// ```ignore
/// for gesture in processor.handle_event(raw, Instant::now(), &mut surface) {
///     // translate and dispatch
/// }
/// // from a frame callback or host timeout:
/// if let Some(tap) = processor.poll(Instant::now()) { /* ... */ }
/// ```
#[derive(Debug)]
pub struct InputProcessor {
    normalizer: PointerEventNormalizer,
    classifier: GestureClassifier,
}

impl InputProcessor {
    /// Create a processor with the given gesture timing.
    #[must_use]
    pub fn new(options: &GestureOptions) -> Self {
        Self {
            normalizer: PointerEventNormalizer::new(),
            classifier: GestureClassifier::new(options),
        }
    }

    /// Process one raw event at `now` and return the gestures it completes.
    pub fn handle_event(
        &mut self,
        raw: RawInput,
        now: Instant,
        surface: &mut dyn InputSurface,
    ) -> Vec<Gesture> {
        match self.normalizer.normalize(raw, surface) {
            Some(event) => self.classifier.handle(event, now),
            None => Vec::new(),
        }
    }

    /// End any press in progress without classifying it, detaching the
    /// session listeners. Used when the host loses focus mid-gesture.
    pub fn cancel_session(
        &mut self,
        now: Instant,
        surface: &mut dyn InputSurface,
    ) -> Vec<Gesture> {
        match self.normalizer.cancel(surface) {
            Some(event) => self.classifier.handle(event, now),
            None => Vec::new(),
        }
    }

    /// Fire the tap timer if due.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        self.classifier.poll(now)
    }

    /// Deadline of the armed tap timer, for hosts that schedule a wakeup.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.classifier.next_deadline()
    }

    /// Current classifier phase.
    #[must_use]
    pub fn phase(&self) -> ClassifierPhase {
        self.classifier.phase()
    }

    /// Whether move/up listeners are attached.
    #[must_use]
    pub fn listeners_attached(&self) -> bool {
        self.normalizer.listeners_attached()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use web_time::Duration;

    use super::*;
    use crate::input::{AlwaysAttached, MouseButton};

    fn touch_start(x: f32, y: f32) -> RawInput {
        RawInput::TouchStart { touches: 1, x, y }
    }

    #[test]
    fn touch_drag_produces_incremental_pans() {
        let mut p = InputProcessor::new(&GestureOptions::default());
        let mut surface = AlwaysAttached;
        let t0 = Instant::now();

        let mut out = p.handle_event(touch_start(100.0, 100.0), t0, &mut surface);
        out.extend(p.handle_event(
            RawInput::TouchMove {
                touches: 1,
                x: 120.0,
                y: 95.0,
            },
            t0,
            &mut surface,
        ));
        out.extend(p.handle_event(
            RawInput::TouchMove {
                touches: 1,
                x: 118.0,
                y: 99.0,
            },
            t0,
            &mut surface,
        ));
        out.extend(p.handle_event(
            RawInput::TouchEnd { touches: 0 },
            t0,
            &mut surface,
        ));

        assert_eq!(
            out,
            vec![
                Gesture::Drag {
                    delta: Vec2::new(20.0, -5.0)
                },
                Gesture::Drag {
                    delta: Vec2::new(-2.0, 4.0)
                },
            ]
        );
        assert!(!p.listeners_attached());
    }

    #[test]
    fn double_tap_by_touch() {
        let mut p = InputProcessor::new(&GestureOptions::default());
        let mut surface = AlwaysAttached;
        let t0 = Instant::now();
        let mut out = Vec::new();
        for offset in [0, 120] {
            let at = t0 + Duration::from_millis(offset);
            out.extend(p.handle_event(touch_start(5.0, 5.0), at, &mut surface));
            out.extend(p.handle_event(
                RawInput::TouchEnd { touches: 0 },
                at,
                &mut surface,
            ));
        }
        assert_eq!(out, vec![Gesture::DoubleTap]);
    }

    #[test]
    fn cancel_session_detaches_and_drops_tap() {
        let mut p = InputProcessor::new(&GestureOptions::default());
        let mut surface = AlwaysAttached;
        let t0 = Instant::now();
        let _ = p.handle_event(
            RawInput::MouseDown {
                button: MouseButton::Left,
                x: 0.0,
                y: 0.0,
            },
            t0,
            &mut surface,
        );
        assert!(p.listeners_attached());
        assert!(p.cancel_session(t0, &mut surface).is_empty());
        assert!(!p.listeners_attached());
        assert_eq!(p.next_deadline(), None);
        assert_eq!(p.phase(), ClassifierPhase::Idle);
    }
}
