use web_time::{Duration, Instant};

use crate::engine::FrameMetrics;

/// Frame timing with smoothed FPS and per-frame render cost.
///
/// Default [`FrameMetrics`] collaborator for the render loop.
pub struct FrameTiming {
    /// Start of the frame currently being rendered
    frame_start: Option<Instant>,
    /// End timestamp of the previous frame
    last_frame_end: Option<Instant>,
    /// Time spent between `begin_frame` and `end_frame` of the last frame
    last_render_time: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames completed since construction
    frame_count: u64,
}

impl FrameTiming {
    /// Create a new frame timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_start: None,
            last_frame_end: None,
            last_render_time: Duration::ZERO,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    /* 5% new value, 95% old value for smooth
                                 * display */
            frame_count: 0,
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Time the last completed frame spent rendering.
    #[must_use]
    pub fn last_render_time(&self) -> Duration {
        self.last_render_time
    }

    /// Number of frames completed.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn record_end(&mut self, now: Instant) {
        if let Some(start) = self.frame_start.take() {
            self.last_render_time = now.duration_since(start);
        }

        if let Some(prev) = self.last_frame_end {
            let frame_time = now.duration_since(prev).as_secs_f32();
            if frame_time > 0.0 {
                let instant_fps = 1.0 / frame_time;
                // Exponential moving average for smooth display
                self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                    + instant_fps * self.smoothing;
            }
        }
        self.last_frame_end = Some(now);
        self.frame_count += 1;
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMetrics for FrameTiming {
    fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    fn end_frame(&mut self) {
        self.record_end(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_measures_render_time() {
        let mut timing = FrameTiming::new();
        timing.begin_frame();
        timing.end_frame();
        timing.begin_frame();
        timing.end_frame();
        assert_eq!(timing.frame_count(), 2);
        assert!(timing.last_render_time() < Duration::from_secs(1));
    }

    #[test]
    fn fps_moves_toward_observed_rate() {
        let mut timing = FrameTiming::new();
        let t0 = Instant::now();
        // 20 ms frames = 50 fps, below the 60 fps seed
        for i in 0..10 {
            timing.record_end(t0 + Duration::from_millis(20 * i));
        }
        assert!(timing.fps() < 60.0);
        assert!(timing.fps() > 50.0);
    }

    #[test]
    fn end_without_begin_keeps_previous_render_time() {
        let mut timing = FrameTiming::new();
        timing.end_frame();
        assert_eq!(timing.last_render_time(), Duration::ZERO);
        assert_eq!(timing.frame_count(), 1);
    }
}
