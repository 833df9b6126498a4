//! Tap / drag / double-tap disambiguation.
//!
//! The classifier consumes canonical [`PointerEvent`]s in arrival order and
//! emits [`Gesture`]s. A drag-free release arms a [`CancellableTimer`]; a
//! second drag-free release inside the window becomes a
//! [`Gesture::DoubleTap`], otherwise the timer resolves the first release
//! as a [`Gesture::Tap`] when it fires.

use glam::Vec2;
use web_time::{Duration, Instant};

use super::event::{PointerEvent, PointerSource};
use crate::options::GestureOptions;
use crate::util::timer::CancellableTimer;

/// A classified gesture, ready for command dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer moved during a press. `delta` is relative to the previous
    /// sample, not to the press origin.
    Drag {
        /// Screen-space movement since the previous sample.
        delta: Vec2,
    },
    /// Confirmed single tap (click-equivalent).
    Tap {
        /// Press position of the tap.
        position: Vec2,
    },
    /// Two taps within the window, or a native double click.
    DoubleTap,
    /// Wheel zoom, raw magnitude.
    WheelZoom {
        /// Raw platform delta, positive = zoom in.
        raw: f32,
    },
    /// Pinch zoom, raw scale ratio.
    PinchZoom {
        /// Scale ratio against pinch start.
        scale: f32,
    },
}

/// Coarse classifier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierPhase {
    /// No press in progress.
    Idle,
    /// Pressed, no movement observed yet.
    Pressed,
    /// Pressed and moved at least once.
    Dragging,
}

/// Released tap waiting to learn whether it is half of a double tap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTap {
    timer: CancellableTimer,
    position: Vec2,
}

/// One press-to-release interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    press: Vec2,
    last: Vec2,
    dragging: bool,
    source: PointerSource,
    /// Tap armed by the previous release, adopted by this session so the
    /// timer always has exactly one owner.
    pending_tap: Option<PendingTap>,
}

impl GestureSession {
    /// Press origin.
    #[must_use]
    pub fn press_position(&self) -> Vec2 {
        self.press
    }

    /// Whether any movement was observed since the press.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Device that started the session.
    #[must_use]
    pub fn source(&self) -> PointerSource {
        self.source
    }
}

#[derive(Debug)]
enum State {
    Idle { pending_tap: Option<PendingTap> },
    Active(GestureSession),
}

/// Stateful tap/drag/double-tap classifier.
#[derive(Debug)]
pub struct GestureClassifier {
    state: State,
    double_tap_window: Duration,
    /// When set, mouse double clicks come from the host's native event and
    /// the classifier does not synthesize them.
    native_double_click: bool,
}

impl GestureClassifier {
    /// Create an idle classifier.
    #[must_use]
    pub fn new(options: &GestureOptions) -> Self {
        Self {
            state: State::Idle { pending_tap: None },
            double_tap_window: options.double_tap_window(),
            native_double_click: options.native_double_click,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ClassifierPhase {
        match &self.state {
            State::Idle { .. } => ClassifierPhase::Idle,
            State::Active(s) if s.dragging => ClassifierPhase::Dragging,
            State::Active(_) => ClassifierPhase::Pressed,
        }
    }

    /// The active session, if a press is in progress.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        match &self.state {
            State::Active(s) => Some(s),
            State::Idle { .. } => None,
        }
    }

    /// Whether a released tap is waiting for its window to close.
    #[must_use]
    pub fn has_pending_tap(&self) -> bool {
        self.pending_slot().is_some()
    }

    /// When the pending tap timer fires, if one is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_slot().map(|p| p.timer.deadline())
    }

    /// Fire the tap timer if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture> {
        let slot = self.pending_slot_mut();
        if !slot.as_ref().is_some_and(|p| p.timer.is_due(now)) {
            return None;
        }
        let tap = slot.take()?;
        log::debug!("tap window elapsed, single tap at {}", tap.position);
        Some(Gesture::Tap {
            position: tap.position,
        })
    }

    /// Classify one canonical event.
    pub fn handle(&mut self, event: PointerEvent, now: Instant) -> Vec<Gesture> {
        let mut out = Vec::new();
        // An expired timer resolves before the event that observes it.
        if let Some(tap) = self.poll(now) {
            out.push(tap);
        }

        match event {
            PointerEvent::Down { position, source } => {
                self.press(position, source);
            }
            PointerEvent::Move { position } => {
                if let Some(delta) = self.motion(position) {
                    out.push(Gesture::Drag { delta });
                }
            }
            PointerEvent::Up => {
                if let Some(gesture) = self.release(now) {
                    out.push(gesture);
                }
            }
            PointerEvent::Cancel => {
                if matches!(self.state, State::Active(_)) {
                    log::debug!("press cancelled");
                    self.state = State::Idle { pending_tap: None };
                }
            }
            PointerEvent::NativeDoubleClick => {
                if self.native_double_click {
                    let _ = self.pending_slot_mut().take();
                    out.push(Gesture::DoubleTap);
                }
            }
            PointerEvent::WheelZoom { raw } => {
                out.push(Gesture::WheelZoom { raw });
            }
            PointerEvent::PinchZoom { scale } => {
                out.push(Gesture::PinchZoom { scale });
            }
        }
        out
    }

    fn press(&mut self, position: Vec2, source: PointerSource) {
        let pending_tap = self.pending_slot_mut().take();
        self.state = State::Active(GestureSession {
            press: position,
            last: position,
            dragging: false,
            source,
            pending_tap,
        });
    }

    fn motion(&mut self, position: Vec2) -> Option<Vec2> {
        let State::Active(session) = &mut self.state else {
            return None;
        };
        let delta = position - session.last;
        session.last = position;
        if !session.dragging {
            session.dragging = true;
            if session.pending_tap.take().is_some() {
                log::debug!("drag started, pending tap cancelled");
            }
        }
        Some(delta)
    }

    fn release(&mut self, now: Instant) -> Option<Gesture> {
        let state =
            std::mem::replace(&mut self.state, State::Idle { pending_tap: None });
        let State::Active(session) = state else {
            return None;
        };

        if session.dragging {
            return None;
        }

        if session.pending_tap.is_some() {
            if session.source == PointerSource::Mouse && self.native_double_click
            {
                log::debug!("second click consumed, awaiting native dblclick");
                return None;
            }
            log::debug!("double tap");
            return Some(Gesture::DoubleTap);
        }

        self.state = State::Idle {
            pending_tap: Some(PendingTap {
                timer: CancellableTimer::start(now, self.double_tap_window),
                position: session.press,
            }),
        };
        None
    }

    fn pending_slot(&self) -> Option<&PendingTap> {
        match &self.state {
            State::Idle { pending_tap } => pending_tap.as_ref(),
            State::Active(session) => session.pending_tap.as_ref(),
        }
    }

    fn pending_slot_mut(&mut self) -> &mut Option<PendingTap> {
        match &mut self.state {
            State::Idle { pending_tap } => pending_tap,
            State::Active(session) => &mut session.pending_tap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(&GestureOptions::default())
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down {
            position: Vec2::new(x, y),
            source: PointerSource::Touch,
        }
    }

    fn mv(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move {
            position: Vec2::new(x, y),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Runs a press/release pair at `at` and returns everything emitted.
    fn tap(c: &mut GestureClassifier, at: Instant) -> Vec<Gesture> {
        let mut out = c.handle(down(10.0, 10.0), at);
        out.extend(c.handle(PointerEvent::Up, at + ms(50)));
        out
    }

    #[test]
    fn still_press_resolves_as_tap_after_window() {
        let mut c = classifier();
        let t0 = Instant::now();
        assert!(tap(&mut c, t0).is_empty());
        assert!(c.has_pending_tap());
        assert_eq!(c.poll(t0 + ms(200)), None);
        assert_eq!(
            c.poll(t0 + ms(350)),
            Some(Gesture::Tap {
                position: Vec2::new(10.0, 10.0)
            })
        );
        assert!(!c.has_pending_tap());
        assert_eq!(c.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn two_taps_inside_window_make_one_double_tap() {
        let mut c = classifier();
        let t0 = Instant::now();
        let mut out = tap(&mut c, t0);
        out.extend(tap(&mut c, t0 + ms(150)));
        assert_eq!(out, vec![Gesture::DoubleTap]);
        assert!(!c.has_pending_tap());
        assert_eq!(c.poll(t0 + ms(2000)), None);
    }

    #[test]
    fn taps_outside_window_stay_single() {
        let mut c = classifier();
        let t0 = Instant::now();
        let mut out = tap(&mut c, t0);
        // First release at t0+50, second press lands after its window.
        out.extend(tap(&mut c, t0 + ms(350)));
        out.extend(c.poll(t0 + ms(2000)));
        assert_eq!(
            out,
            vec![
                Gesture::Tap {
                    position: Vec2::new(10.0, 10.0)
                },
                Gesture::Tap {
                    position: Vec2::new(10.0, 10.0)
                },
            ]
        );
    }

    #[test]
    fn tap_window_closes_at_deadline() {
        let mut c = classifier();
        let t0 = Instant::now();
        let _ = c.handle(down(0.0, 0.0), t0);
        let _ = c.handle(PointerEvent::Up, t0);
        let out = c.handle(down(0.0, 0.0), t0 + ms(300));
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Gesture::Tap { .. }));
    }

    #[test]
    fn drag_deltas_are_against_previous_sample() {
        let mut c = classifier();
        let t0 = Instant::now();
        let mut out = c.handle(down(100.0, 100.0), t0);
        out.extend(c.handle(mv(120.0, 95.0), t0 + ms(10)));
        out.extend(c.handle(mv(118.0, 99.0), t0 + ms(20)));
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
        assert_eq!(c.phase(), ClassifierPhase::Dragging);
    }

    #[test]
    fn any_movement_suppresses_tap_even_when_reverted() {
        let mut c = classifier();
        let t0 = Instant::now();
        let _ = c.handle(down(10.0, 10.0), t0);
        let _ = c.handle(mv(12.0, 10.0), t0 + ms(5));
        let _ = c.handle(mv(10.0, 10.0), t0 + ms(10));
        assert!(c.session().is_some_and(GestureSession::dragging));
        assert!(c.handle(PointerEvent::Up, t0 + ms(20)).is_empty());
        assert!(!c.has_pending_tap());
        assert_eq!(c.poll(t0 + ms(1000)), None);
        assert_eq!(c.phase(), ClassifierPhase::Idle);
    }

    #[test]
    fn drag_onset_cancels_pending_tap() {
        let mut c = classifier();
        let t0 = Instant::now();
        let _ = tap(&mut c, t0);
        let _ = c.handle(down(10.0, 10.0), t0 + ms(100));
        assert!(c.has_pending_tap());
        let _ = c.handle(mv(30.0, 10.0), t0 + ms(120));
        assert!(!c.has_pending_tap());
        assert!(c.handle(PointerEvent::Up, t0 + ms(140)).is_empty());
        assert_eq!(c.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn zero_length_move_still_counts_as_drag() {
        let mut c = classifier();
        let t0 = Instant::now();
        let _ = c.handle(down(10.0, 10.0), t0);
        let out = c.handle(mv(10.0, 10.0), t0);
        assert_eq!(out, vec![Gesture::Drag { delta: Vec2::ZERO }]);
        assert_eq!(c.phase(), ClassifierPhase::Dragging);
    }

    #[test]
    fn timer_expiring_during_press_resolves_first_tap() {
        let mut c = classifier();
        let t0 = Instant::now();
        let _ = tap(&mut c, t0);
        let _ = c.handle(down(10.0, 10.0), t0 + ms(200));
        assert!(matches!(c.poll(t0 + ms(400)), Some(Gesture::Tap { .. })));
        // The held press is now a fresh first tap.
        assert!(c.handle(PointerEvent::Up, t0 + ms(450)).is_empty());
        assert!(c.has_pending_tap());
    }

    #[test]
    fn native_double_click_replaces_synthesized_one_for_mouse() {
        let options = GestureOptions {
            native_double_click: true,
            ..GestureOptions::default()
        };
        let mut c = GestureClassifier::new(&options);
        let t0 = Instant::now();
        let click = |c: &mut GestureClassifier, at: Instant| {
            let mut out = c.handle(
                PointerEvent::Down {
                    position: Vec2::ZERO,
                    source: PointerSource::Mouse,
                },
                at,
            );
            out.extend(c.handle(PointerEvent::Up, at));
            out
        };
        let mut out = click(&mut c, t0);
        out.extend(click(&mut c, t0 + ms(100)));
        out.extend(c.handle(PointerEvent::NativeDoubleClick, t0 + ms(101)));
        out.extend(c.poll(t0 + ms(1000)));
        assert_eq!(out, vec![Gesture::DoubleTap]);
    }

    #[test]
    fn native_double_click_ignored_when_synthesizing() {
        let mut c = classifier();
        let out = c.handle(PointerEvent::NativeDoubleClick, Instant::now());
        assert!(out.is_empty());
    }

    #[test]
    fn cancel_discards_session_without_tap() {
        let mut c = classifier();
        let t0 = Instant::now();
        let _ = c.handle(down(0.0, 0.0), t0);
        assert!(c.handle(PointerEvent::Cancel, t0 + ms(10)).is_empty());
        assert_eq!(c.phase(), ClassifierPhase::Idle);
        assert!(!c.has_pending_tap());
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut c = classifier();
        assert!(c.handle(mv(1.0, 1.0), Instant::now()).is_empty());
    }

    #[test]
    fn next_deadline_tracks_armed_timer() {
        let mut c = classifier();
        let t0 = Instant::now();
        assert_eq!(c.next_deadline(), None);
        let _ = c.handle(down(0.0, 0.0), t0);
        let _ = c.handle(PointerEvent::Up, t0);
        assert_eq!(c.next_deadline(), Some(t0 + ms(300)));
    }
}
