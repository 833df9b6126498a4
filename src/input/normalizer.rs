//! Mouse/touch unification into canonical [`PointerEvent`]s.

use glam::Vec2;

use super::event::{
    MouseButton, PointerEvent, PointerSource, PointerState, RawInput,
};

/// Input surface whose move/up listeners live only as long as a press.
///
/// Host adapters implement this to bind and unbind the platform listeners
/// that deliver pointer motion and release. The normalizer calls
/// [`attach_session_listeners`](Self::attach_session_listeners) once per
/// press and [`detach_session_listeners`](Self::detach_session_listeners)
/// on every exit path (release, cancel, lost focus).
pub trait InputSurface {
    /// Start delivering move/up events.
    fn attach_session_listeners(&mut self);
    /// Stop delivering move/up events.
    fn detach_session_listeners(&mut self);
}

/// Surface for hosts that deliver move/up events unconditionally, such as
/// native windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysAttached;

impl InputSurface for AlwaysAttached {
    fn attach_session_listeners(&mut self) {}

    fn detach_session_listeners(&mut self) {}
}

/// Tracks the single primary pointer and owns listener attachment.
#[derive(Debug, Default)]
pub struct PointerEventNormalizer {
    pointer: PointerState,
    listeners_attached: bool,
}

impl PointerEventNormalizer {
    /// Create a normalizer with no active press.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tracked pointer.
    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Whether move/up listeners are currently attached.
    #[must_use]
    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    /// Translate one raw event. Unsupported shapes (secondary buttons,
    /// extra fingers, motion outside a press) yield `None`.
    pub fn normalize(
        &mut self,
        raw: RawInput,
        surface: &mut dyn InputSurface,
    ) -> Option<PointerEvent> {
        match raw {
            RawInput::MouseDown { button, x, y } => {
                if button != MouseButton::Left {
                    return None;
                }
                Some(self.begin(PointerSource::Mouse, Vec2::new(x, y), surface))
            }
            RawInput::MouseMove { x, y } => {
                self.track(PointerSource::Mouse, Vec2::new(x, y))
            }
            RawInput::MouseUp { button } => {
                if button != MouseButton::Left {
                    return None;
                }
                self.end(PointerSource::Mouse, surface)
            }
            RawInput::TouchStart { touches, x, y } => {
                if touches != 1 {
                    return None;
                }
                Some(self.begin(PointerSource::Touch, Vec2::new(x, y), surface))
            }
            RawInput::TouchMove { touches, x, y } => {
                if touches != 1 {
                    return None;
                }
                self.track(PointerSource::Touch, Vec2::new(x, y))
            }
            RawInput::TouchEnd { .. } => self.end(PointerSource::Touch, surface),
            RawInput::TouchCancel => self.cancel(surface),
            RawInput::Wheel { delta } => {
                Some(PointerEvent::WheelZoom { raw: delta })
            }
            RawInput::Pinch { scale } => Some(PointerEvent::PinchZoom { scale }),
            RawInput::DoubleClick => Some(PointerEvent::NativeDoubleClick),
        }
    }

    /// Abort the active press, if any, detaching listeners.
    pub fn cancel(
        &mut self,
        surface: &mut dyn InputSurface,
    ) -> Option<PointerEvent> {
        if !self.pointer.active {
            return None;
        }
        self.release(surface);
        Some(PointerEvent::Cancel)
    }

    fn begin(
        &mut self,
        source: PointerSource,
        position: Vec2,
        surface: &mut dyn InputSurface,
    ) -> PointerEvent {
        self.pointer = PointerState {
            position,
            active: true,
            source,
        };
        if !self.listeners_attached {
            surface.attach_session_listeners();
            self.listeners_attached = true;
        }
        PointerEvent::Down { position, source }
    }

    fn track(
        &mut self,
        source: PointerSource,
        position: Vec2,
    ) -> Option<PointerEvent> {
        if !self.pointer.active || self.pointer.source != source {
            return None;
        }
        self.pointer.position = position;
        Some(PointerEvent::Move { position })
    }

    fn end(
        &mut self,
        source: PointerSource,
        surface: &mut dyn InputSurface,
    ) -> Option<PointerEvent> {
        if !self.pointer.active || self.pointer.source != source {
            return None;
        }
        self.release(surface);
        Some(PointerEvent::Up)
    }

    fn release(&mut self, surface: &mut dyn InputSurface) {
        self.pointer.active = false;
        if self.listeners_attached {
            surface.detach_session_listeners();
            self.listeners_attached = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts attach/detach calls.
    #[derive(Default)]
    struct CountingSurface {
        attached: u32,
        detached: u32,
    }

    impl InputSurface for CountingSurface {
        fn attach_session_listeners(&mut self) {
            self.attached += 1;
        }

        fn detach_session_listeners(&mut self) {
            self.detached += 1;
        }
    }

    fn down(x: f32, y: f32) -> RawInput {
        RawInput::MouseDown {
            button: MouseButton::Left,
            x,
            y,
        }
    }

    #[test]
    fn mouse_press_attaches_and_release_detaches() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();

        let ev = n.normalize(down(5.0, 6.0), &mut surface);
        assert_eq!(
            ev,
            Some(PointerEvent::Down {
                position: Vec2::new(5.0, 6.0),
                source: PointerSource::Mouse,
            })
        );
        assert!(n.listeners_attached());

        let ev = n.normalize(
            RawInput::MouseUp {
                button: MouseButton::Left,
            },
            &mut surface,
        );
        assert_eq!(ev, Some(PointerEvent::Up));
        assert_eq!((surface.attached, surface.detached), (1, 1));
        assert!(!n.listeners_attached());
    }

    #[test]
    fn secondary_buttons_are_ignored() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();
        let ev = n.normalize(
            RawInput::MouseDown {
                button: MouseButton::Right,
                x: 0.0,
                y: 0.0,
            },
            &mut surface,
        );
        assert_eq!(ev, None);
        assert_eq!(surface.attached, 0);
    }

    #[test]
    fn second_finger_is_silently_dropped() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();

        let first = n.normalize(
            RawInput::TouchStart {
                touches: 1,
                x: 1.0,
                y: 1.0,
            },
            &mut surface,
        );
        assert!(matches!(first, Some(PointerEvent::Down { .. })));

        let second = n.normalize(
            RawInput::TouchStart {
                touches: 2,
                x: 50.0,
                y: 50.0,
            },
            &mut surface,
        );
        assert_eq!(second, None);

        let two_finger_move = n.normalize(
            RawInput::TouchMove {
                touches: 2,
                x: 3.0,
                y: 3.0,
            },
            &mut surface,
        );
        assert_eq!(two_finger_move, None);
        assert_eq!(surface.attached, 1);
    }

    #[test]
    fn motion_without_press_is_ignored() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();
        assert_eq!(
            n.normalize(RawInput::MouseMove { x: 1.0, y: 2.0 }, &mut surface),
            None
        );
        assert_eq!(
            n.normalize(
                RawInput::MouseUp {
                    button: MouseButton::Left
                },
                &mut surface
            ),
            None
        );
        assert_eq!(surface.detached, 0);
    }

    #[test]
    fn touch_cancel_detaches() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();
        let _ = n.normalize(
            RawInput::TouchStart {
                touches: 1,
                x: 0.0,
                y: 0.0,
            },
            &mut surface,
        );
        assert_eq!(
            n.normalize(RawInput::TouchCancel, &mut surface),
            Some(PointerEvent::Cancel)
        );
        assert_eq!((surface.attached, surface.detached), (1, 1));
        assert_eq!(n.cancel(&mut surface), None);
    }

    #[test]
    fn repeated_press_does_not_double_attach() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();
        let _ = n.normalize(down(0.0, 0.0), &mut surface);
        let _ = n.normalize(down(4.0, 4.0), &mut surface);
        let _ = n.normalize(
            RawInput::MouseUp {
                button: MouseButton::Left,
            },
            &mut surface,
        );
        assert_eq!((surface.attached, surface.detached), (1, 1));
    }

    #[test]
    fn zoom_signals_bypass_the_session() {
        let mut n = PointerEventNormalizer::new();
        let mut surface = CountingSurface::default();
        assert_eq!(
            n.normalize(RawInput::Wheel { delta: -3.0 }, &mut surface),
            Some(PointerEvent::WheelZoom { raw: -3.0 })
        );
        assert_eq!(
            n.normalize(RawInput::Pinch { scale: 0.8 }, &mut surface),
            Some(PointerEvent::PinchZoom { scale: 0.8 })
        );
        assert_eq!(surface.attached, 0);
    }
}
