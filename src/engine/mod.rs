//! Interaction controller: gesture pipeline, command dispatch, and the
//! render loop behind one owner.
//!
//! Hosts forward raw input, focus changes, resizes and frame callbacks to
//! an [`InteractionController`]; it drives the [`Scene`] and [`UiSurface`]
//! collaborators synchronously from inside those calls.

/// Collaborator traits and their error types.
pub mod collaborators;
/// Outbound command vocabulary.
pub mod command;
/// Gesture → command translation.
pub mod dispatch;
/// Run/pause state machine and per-frame procedure.
pub mod render_loop;

use std::collections::HashMap;

pub use collaborators::{
    CaptureError, FrameCapture, FrameMetrics, FrameScheduler, ImmediateLoader,
    ModelLoader, NoCapture, Scene, SchedulerError, UiSurface,
};
pub use command::ViewerCommand;
pub use dispatch::{pinch_direction, wheel_direction, CommandDispatcher};
pub use render_loop::{LoopState, RenderLoop, TickOutcome};
use web_time::Instant;

use crate::input::{Gesture, InputProcessor, InputSurface, RawInput, UiAction};
use crate::options::Options;
use crate::util::frame_timing::FrameTiming;

/// Handler for a pluggable [`UiAction`] (share, save, load, …).
pub type ActionHandler = Box<dyn FnMut()>;

/// Single owner of all interaction state for one viewer.
///
/// Variants of the viewer that offer more or fewer actions differ only in
/// which handlers they [`register_action`](Self::register_action).
pub struct InteractionController<S: Scene, U: UiSurface> {
    scene: S,
    ui: U,
    options: Options,
    input: InputProcessor,
    dispatcher: CommandDispatcher,
    render_loop: RenderLoop,
    metrics: Box<dyn FrameMetrics>,
    capture: Box<dyn FrameCapture>,
    actions: HashMap<UiAction, ActionHandler>,
    ui_visible: bool,
    ready: bool,
    viewport: Option<(u32, u32)>,
}

impl<S: Scene, U: UiSurface> InteractionController<S, U> {
    /// Create a controller. Input is ignored and no frames are scheduled
    /// until [`model_ready`](Self::model_ready).
    #[must_use]
    pub fn new(scene: S, ui: U, options: Options) -> Self {
        Self {
            input: InputProcessor::new(&options.gesture),
            dispatcher: CommandDispatcher::new(&options.zoom),
            render_loop: RenderLoop::new(&options.render_loop),
            metrics: Box::new(FrameTiming::new()),
            capture: Box::new(NoCapture),
            actions: HashMap::new(),
            ui_visible: true,
            ready: false,
            viewport: None,
            scene,
            ui,
            options,
        }
    }

    /// Replace the frame metrics collaborator.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Box<dyn FrameMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the frame capture collaborator.
    #[must_use]
    pub fn with_capture(mut self, capture: Box<dyn FrameCapture>) -> Self {
        self.capture = capture;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The scene collaborator.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene collaborator.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The UI collaborator.
    #[must_use]
    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The gesture pipeline.
    #[must_use]
    pub fn input(&self) -> &InputProcessor {
        &self.input
    }

    /// The render loop.
    #[must_use]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// Whether the model has loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether UI chrome is shown.
    #[must_use]
    pub fn ui_visible(&self) -> bool {
        self.ui_visible
    }

    /// Whether a screenshot will be taken on the next tick.
    #[must_use]
    pub fn screenshot_requested(&self) -> bool {
        self.render_loop.screenshot_requested()
    }

    /// Deadline of the armed tap timer, for hosts that schedule a wakeup.
    #[must_use]
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.input.next_deadline()
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Register the handler for a pluggable action, replacing any previous
    /// one. `Screenshot` and `ToggleUi` are built in and cannot be
    /// overridden.
    pub fn register_action(
        &mut self,
        action: UiAction,
        handler: impl FnMut() + 'static,
    ) {
        if matches!(action, UiAction::Screenshot | UiAction::ToggleUi) {
            log::warn!("{action:?} is built in; handler ignored");
            return;
        }
        let _ = self.actions.insert(action, Box::new(handler));
    }

    /// The model finished loading: show the UI, push the viewport, and
    /// start the render loop.
    pub fn model_ready(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.ready {
            return;
        }
        self.ready = true;
        log::info!("model ready, starting interaction");

        if let Some((width, height)) = self.viewport {
            self.scene.update_viewport(width, height);
        }
        self.toggle_ui(Some(true));
        if self.render_loop.start() {
            let _ = self.tick(scheduler);
        }
    }

    /// Host window gained or lost focus.
    ///
    /// Losing focus ends any press in progress and, if configured, pauses
    /// the loop. Regaining it resumes the loop right away.
    pub fn set_focused(
        &mut self,
        focused: bool,
        now: Instant,
        surface: &mut dyn InputSurface,
        scheduler: &mut dyn FrameScheduler,
    ) {
        if focused {
            self.resume(scheduler);
            return;
        }

        for gesture in self.input.cancel_session(now, surface) {
            self.apply_gesture(gesture);
        }
        if self.options.render_loop.pause_on_blur {
            self.pause();
        }
    }

    /// Stop rendering after the frame in flight, if any.
    pub fn pause(&mut self) {
        self.render_loop.pause();
    }

    /// Continue rendering. Ticks immediately unless a frame is already
    /// scheduled or the loop never started.
    pub fn resume(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.render_loop.resume() {
            let _ = self.tick(scheduler);
        }
    }

    /// The viewport changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
        if self.ready {
            self.scene.update_viewport(width, height);
        }
    }

    /// Run one frame. Called from the host's animation-frame or timeout
    /// callback.
    pub fn tick(&mut self, scheduler: &mut dyn FrameScheduler) -> TickOutcome {
        self.render_loop.tick(
            &mut self.scene,
            self.metrics.as_mut(),
            self.capture.as_mut(),
            scheduler,
        )
    }

    // ── Input ───────────────────────────────────────────────────────

    /// Process one raw input event.
    pub fn handle_input(
        &mut self,
        raw: RawInput,
        now: Instant,
        surface: &mut dyn InputSurface,
    ) {
        if !self.ready {
            log::trace!("input before model ready dropped: {raw:?}");
            return;
        }
        for gesture in self.input.handle_event(raw, now, surface) {
            self.apply_gesture(gesture);
        }
    }

    /// Fire the tap timer if due. Hosts call this from a timeout armed at
    /// [`next_timer_deadline`](Self::next_timer_deadline) or once per
    /// event-loop iteration.
    pub fn poll_timers(&mut self, now: Instant) {
        if let Some(gesture) = self.input.poll(now) {
            self.apply_gesture(gesture);
        }
    }

    /// Look up a key code and run its bound action. Returns `true` if a
    /// binding matched.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !self.ready {
            return false;
        }
        let Some(action) = self.options.keybindings.lookup(key) else {
            return false;
        };
        self.execute(ViewerCommand::Action(action));
        true
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Ask for a screenshot on the next tick.
    pub fn request_screenshot(&mut self) {
        self.render_loop.request_screenshot();
    }

    /// Show (`Some(true)`), hide (`Some(false)`) or flip (`None`) the UI.
    pub fn toggle_ui(&mut self, show: Option<bool>) {
        let visible = show.unwrap_or(!self.ui_visible);
        self.ui_visible = visible;
        log::debug!("ui visible: {visible}");
        self.ui.set_ui_visible(visible);
    }

    /// Route a command to its collaborator.
    pub fn execute(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::Pan { delta } => self.scene.drag_view(delta),
            ViewerCommand::Zoom { direction } => self.scene.zoom(direction),
            ViewerCommand::ToggleUi { show } => self.toggle_ui(show),
            ViewerCommand::Click { position } => self.ui.click(position),
            ViewerCommand::Action(action) => self.run_action(action),
            ViewerCommand::Resize { width, height } => {
                self.resize(width, height);
            }
        }
    }

    fn run_action(&mut self, action: UiAction) {
        match action {
            UiAction::Screenshot => self.request_screenshot(),
            UiAction::ToggleUi => self.toggle_ui(None),
            _ => match self.actions.get_mut(&action) {
                Some(handler) => handler(),
                None => log::debug!("no handler registered for {action:?}"),
            },
        }
    }

    fn apply_gesture(&mut self, gesture: Gesture) {
        if let Some(command) = self.dispatcher.translate(gesture) {
            log::trace!("{gesture:?} -> {command:?}");
            self.execute(command);
        }
    }
}
