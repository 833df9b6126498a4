use glam::Vec2;

/// Distances below this are treated as coincident fingers.
const MIN_PINCH_DISTANCE: f32 = 1.0;

/// Derives a pinch scale ratio from two-finger touch positions.
///
/// Runs independently of single-pointer tracking; hosts without a native
/// pinch signal feed every multi-touch update through
/// [`update`](Self::update) and forward the returned scale as
/// [`RawInput::Pinch`](super::RawInput::Pinch).
#[derive(Debug, Default)]
pub struct PinchRecognizer {
    start_distance: Option<f32>,
}

impl PinchRecognizer {
    /// Create a recognizer with no pinch in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a two-finger pinch is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start_distance.is_some()
    }

    /// Feed the current touch points. Returns the scale relative to the
    /// distance when the second finger landed, or `None` when the update
    /// starts, ends, or is not a two-finger pinch.
    pub fn update(&mut self, touches: &[Vec2]) -> Option<f32> {
        let [a, b] = touches else {
            self.reset();
            return None;
        };
        let distance = a.distance(*b);

        match self.start_distance {
            Some(start) => Some(distance / start),
            None => {
                if distance >= MIN_PINCH_DISTANCE {
                    self.start_distance = Some(distance);
                }
                None
            }
        }
    }

    /// Forget the current pinch.
    pub fn reset(&mut self) {
        self.start_distance = None;
    }
}
