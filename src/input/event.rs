use glam::Vec2;

/// Raw host input, before normalization.
///
/// Host adapters (browser canvas, winit window) translate their native
/// events into these variants and feed them to an
/// [`InputProcessor`](super::InputProcessor). Coordinates are client-space
/// pixels.
///
/// # Example
///
/// ```ignore
/// controller.handle_input(
///     RawInput::MouseDown { button: MouseButton::Left, x: 10.0, y: 20.0 },
///     Instant::now(),
///     &mut surface,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// Mouse button pressed at a position.
    MouseDown {
        /// Which button changed.
        button: MouseButton,
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Mouse moved to an absolute position.
    MouseMove {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Mouse button released.
    MouseUp {
        /// Which button changed.
        button: MouseButton,
    },
    /// A finger touched down. `x`/`y` belong to the first touch point.
    TouchStart {
        /// Number of touch points currently on the surface.
        touches: u32,
        /// Horizontal position of the first touch point.
        x: f32,
        /// Vertical position of the first touch point.
        y: f32,
    },
    /// Touch points moved. `x`/`y` belong to the first touch point.
    TouchMove {
        /// Number of touch points currently on the surface.
        touches: u32,
        /// Horizontal position of the first touch point.
        x: f32,
        /// Vertical position of the first touch point.
        y: f32,
    },
    /// A finger lifted.
    TouchEnd {
        /// Number of touch points still on the surface.
        touches: u32,
    },
    /// The platform aborted the touch sequence.
    TouchCancel,
    /// Scroll wheel. Positive means "toward the user's zoom-in".
    Wheel {
        /// Platform-dependent magnitude (line count, pixels, or 120ths).
        delta: f32,
    },
    /// Two-finger pinch, as a ratio against the distance at pinch start.
    Pinch {
        /// `< 1.0` when fingers move together, `> 1.0` when apart.
        scale: f32,
    },
    /// The host's native double-click event.
    DoubleClick,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}

/// Which device produced the tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// Mouse or trackpad cursor.
    Mouse,
    /// Single finger on a touch screen.
    Touch,
}

/// The single tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Last reported position.
    pub position: Vec2,
    /// Whether a press is in progress.
    pub active: bool,
    /// Device that started the current (or last) press.
    pub source: PointerSource,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            active: false,
            source: PointerSource::Mouse,
        }
    }
}

/// Canonical pointer and zoom events emitted by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary pointer pressed.
    Down {
        /// Press position.
        position: Vec2,
        /// Device that pressed.
        source: PointerSource,
    },
    /// Primary pointer moved during a press.
    Move {
        /// New position.
        position: Vec2,
    },
    /// Primary pointer released.
    Up,
    /// Press aborted (touch cancel, window lost focus).
    Cancel,
    /// Wheel zoom signal with the raw platform magnitude.
    WheelZoom {
        /// Raw delta, positive = zoom in.
        raw: f32,
    },
    /// Pinch zoom signal.
    PinchZoom {
        /// Scale ratio against pinch start.
        scale: f32,
    },
    /// Host-delivered double click.
    NativeDoubleClick,
}
