//! Pausable render loop with one-shot screenshot capture.
//!
//! The loop never blocks and never forcibly aborts a frame. Pausing only
//! stops the next reschedule: a frame callback already queued by the host
//! still arrives, sees the loop paused, and exits without work.

use web_time::Duration;

use super::collaborators::{
    FrameCapture, FrameMetrics, FrameScheduler, Scene,
};
use crate::options::RenderLoopOptions;

/// Run state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticks render and reschedule.
    Running,
    /// Ticks exit immediately and do not reschedule.
    Paused,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Rendered a frame and scheduled the next one.
    Rendered,
    /// Loop paused or not started: no work, nothing scheduled.
    Halted,
}

/// Run/pause state machine and per-frame procedure.
#[derive(Debug)]
pub struct RenderLoop {
    running: bool,
    started: bool,
    /// A frame callback is queued with the host.
    frame_pending: bool,
    screenshot_requested: bool,
    fallback_interval: Duration,
    screenshot_file_name: String,
    fallback_warned: bool,
}

impl RenderLoop {
    /// Create a loop in the `Running` state that has not started ticking.
    #[must_use]
    pub fn new(options: &RenderLoopOptions) -> Self {
        Self {
            running: true,
            started: false,
            frame_pending: false,
            screenshot_requested: false,
            fallback_interval: options.fallback_frame_interval(),
            screenshot_file_name: options.screenshot_file_name.clone(),
            fallback_warned: false,
        }
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        if self.running {
            LoopState::Running
        } else {
            LoopState::Paused
        }
    }

    /// Whether [`start`](Self::start) has been called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether a frame callback is queued with the host.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Mark the loop live. Returns `true` if the caller should run the
    /// first tick now.
    pub fn start(&mut self) -> bool {
        self.started = true;
        self.running && !self.frame_pending
    }

    /// Stop rescheduling. A queued frame still fires and halts.
    pub fn pause(&mut self) {
        if self.running {
            log::info!("render loop paused");
        }
        self.running = false;
    }

    /// Resume after a pause. Returns `true` if the caller should tick
    /// immediately; `false` when already running, not started, or a queued
    /// frame will carry the loop on by itself.
    pub fn resume(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        log::info!("render loop resumed");
        self.started && !self.frame_pending
    }

    /// Capture on the next tick. Repeated requests before that tick
    /// collapse into one capture.
    pub fn request_screenshot(&mut self) {
        self.screenshot_requested = true;
    }

    /// Whether a capture is queued for the next tick.
    #[must_use]
    pub fn screenshot_requested(&self) -> bool {
        self.screenshot_requested
    }

    /// Run one frame.
    ///
    /// Capture (if requested) happens before the normal render so the
    /// visible frame is always the normal one.
    pub fn tick(
        &mut self,
        scene: &mut dyn Scene,
        metrics: &mut dyn FrameMetrics,
        capture: &mut dyn FrameCapture,
        scheduler: &mut dyn FrameScheduler,
    ) -> TickOutcome {
        self.frame_pending = false;
        if !self.started || !self.running {
            log::trace!("tick halted");
            return TickOutcome::Halted;
        }

        metrics.begin_frame();

        if self.screenshot_requested {
            // Cleared before the attempt: a failed capture is not retried.
            self.screenshot_requested = false;
            scene.render_capture_variant();
            match capture.save_frame(&self.screenshot_file_name) {
                Ok(()) => {
                    log::info!("screenshot saved as {}", self.screenshot_file_name);
                }
                Err(e) => log::warn!("screenshot skipped: {e}"),
            }
        }

        scene.render();
        metrics.end_frame();

        self.schedule_next(scheduler);
        TickOutcome::Rendered
    }

    fn schedule_next(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Err(e) = scheduler.request_animation_frame() {
            if !self.fallback_warned {
                log::warn!(
                    "{e}; pacing frames every {:?}",
                    self.fallback_interval
                );
                self.fallback_warned = true;
            }
            scheduler.set_timeout(self.fallback_interval);
        }
        self.frame_pending = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use glam::Vec2;

    use super::*;
    use crate::engine::collaborators::{CaptureError, SchedulerError};

    /// Records scene calls in order.
    #[derive(Default)]
    pub(crate) struct RecordingScene {
        pub(crate) calls: Vec<String>,
    }

    impl Scene for RecordingScene {
        fn drag_view(&mut self, delta: Vec2) {
            self.calls.push(format!("drag {} {}", delta.x, delta.y));
        }

        fn zoom(&mut self, direction: f32) {
            self.calls.push(format!("zoom {direction}"));
        }

        fn render(&mut self) {
            self.calls.push("render".into());
        }

        fn render_capture_variant(&mut self) {
            self.calls.push("render_capture".into());
        }

        fn update_viewport(&mut self, width: u32, height: u32) {
            self.calls.push(format!("viewport {width}x{height}"));
        }
    }

    #[derive(Default)]
    pub(crate) struct CountingMetrics {
        pub(crate) begun: u32,
        pub(crate) ended: u32,
    }

    impl FrameMetrics for CountingMetrics {
        fn begin_frame(&mut self) {
            self.begun += 1;
        }

        fn end_frame(&mut self) {
            self.ended += 1;
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeCapture {
        pub(crate) saved: Vec<String>,
        pub(crate) fail: bool,
    }

    impl FrameCapture for FakeCapture {
        fn save_frame(&mut self, file_name: &str) -> Result<(), CaptureError> {
            if self.fail {
                return Err(CaptureError::EmptyImage);
            }
            self.saved.push(file_name.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeScheduler {
        pub(crate) frames: u32,
        pub(crate) timeouts: Vec<Duration>,
        pub(crate) no_animation_frames: bool,
    }

    impl FrameScheduler for FakeScheduler {
        fn request_animation_frame(&mut self) -> Result<(), SchedulerError> {
            if self.no_animation_frames {
                return Err(SchedulerError::Unavailable);
            }
            self.frames += 1;
            Ok(())
        }

        fn set_timeout(&mut self, delay: Duration) {
            self.timeouts.push(delay);
        }
    }

    struct Rig {
        scene: RecordingScene,
        metrics: CountingMetrics,
        capture: FakeCapture,
        scheduler: FakeScheduler,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                scene: RecordingScene::default(),
                metrics: CountingMetrics::default(),
                capture: FakeCapture::default(),
                scheduler: FakeScheduler::default(),
            }
        }

        fn tick(&mut self, lp: &mut RenderLoop) -> TickOutcome {
            lp.tick(
                &mut self.scene,
                &mut self.metrics,
                &mut self.capture,
                &mut self.scheduler,
            )
        }

        fn renders(&self) -> usize {
            self.scene.calls.iter().filter(|c| *c == "render").count()
        }
    }

    fn started_loop() -> RenderLoop {
        let mut lp = RenderLoop::new(&RenderLoopOptions::default());
        assert!(lp.start());
        lp
    }

    #[test]
    fn tick_runs_full_frame_and_reschedules() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        assert_eq!(rig.tick(&mut lp), TickOutcome::Rendered);
        assert_eq!(rig.scene.calls, vec!["render"]);
        assert_eq!((rig.metrics.begun, rig.metrics.ended), (1, 1));
        assert_eq!(rig.scheduler.frames, 1);
        assert!(lp.frame_pending());
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut lp = RenderLoop::new(&RenderLoopOptions::default());
        let mut rig = Rig::new();
        assert_eq!(rig.tick(&mut lp), TickOutcome::Halted);
        assert!(rig.scene.calls.is_empty());
        assert_eq!(rig.scheduler.frames, 0);
    }

    #[test]
    fn repeated_screenshot_requests_capture_once() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        for _ in 0..5 {
            lp.request_screenshot();
        }
        let _ = rig.tick(&mut lp);
        let _ = rig.tick(&mut lp);
        assert_eq!(rig.capture.saved, vec!["screenshot.png"]);
        assert_eq!(
            rig.scene.calls,
            vec!["render_capture", "render", "render"]
        );
        assert!(!lp.screenshot_requested());
    }

    #[test]
    fn failed_capture_clears_flag_and_still_renders() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        rig.capture.fail = true;
        lp.request_screenshot();
        assert_eq!(rig.tick(&mut lp), TickOutcome::Rendered);
        assert!(!lp.screenshot_requested());
        assert_eq!(rig.renders(), 1);
        assert_eq!(rig.scheduler.frames, 1);

        rig.capture.fail = false;
        let _ = rig.tick(&mut lp);
        assert!(rig.capture.saved.is_empty());
    }

    #[test]
    fn dangling_tick_after_pause_is_a_gate_check() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        let _ = rig.tick(&mut lp);
        lp.pause();
        assert_eq!(lp.state(), LoopState::Paused);

        // The frame queued before the pause still fires.
        assert_eq!(rig.tick(&mut lp), TickOutcome::Halted);
        assert_eq!(rig.renders(), 1);
        assert_eq!(rig.scheduler.frames, 1);
        assert!(!lp.frame_pending());
        assert_eq!(rig.metrics.begun, 1);
    }

    #[test]
    fn resume_after_loop_drained_ticks_immediately() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        let _ = rig.tick(&mut lp);
        lp.pause();
        let _ = rig.tick(&mut lp);

        assert!(lp.resume());
        assert_eq!(rig.tick(&mut lp), TickOutcome::Rendered);
        assert_eq!(rig.renders(), 2);
        assert!(lp.frame_pending());
    }

    #[test]
    fn resume_with_frame_in_flight_does_not_fork_loop() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        let _ = rig.tick(&mut lp);
        lp.pause();
        assert!(!lp.resume());
        // The in-flight frame carries on.
        assert_eq!(rig.tick(&mut lp), TickOutcome::Rendered);
    }

    #[test]
    fn resume_while_running_is_noop() {
        let mut lp = started_loop();
        assert!(!lp.resume());
    }

    #[test]
    fn start_while_paused_waits_for_resume() {
        let mut lp = RenderLoop::new(&RenderLoopOptions::default());
        lp.pause();
        assert!(!lp.start());
        assert!(lp.resume());
    }

    #[test]
    fn missing_animation_frames_fall_back_to_timer() {
        let mut lp = started_loop();
        let mut rig = Rig::new();
        rig.scheduler.no_animation_frames = true;
        let _ = rig.tick(&mut lp);
        let _ = rig.tick(&mut lp);
        let expected = RenderLoopOptions::default().fallback_frame_interval();
        assert_eq!(rig.scheduler.timeouts, vec![expected, expected]);
        assert!(lp.frame_pending());
    }
}
