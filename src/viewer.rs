//! Standalone window host backed by winit.
//!
//! Maps window events onto an [`InteractionController`]: mouse, touch,
//! wheel and trackpad pinch become [`RawInput`], focus changes pause and
//! resume the render loop, and redraw requests serve as the
//! animation-frame primitive.
//!
//! ```no_run
//! # use glance::{Viewer, Scene, UiSurface};
//! # struct MyScene;
//! # impl Scene for MyScene {
//! #     fn drag_view(&mut self, _: glam::Vec2) {}
//! #     fn zoom(&mut self, _: f32) {}
//! #     fn render(&mut self) {}
//! #     fn render_capture_variant(&mut self) {}
//! #     fn update_viewport(&mut self, _: u32, _: u32) {}
//! # }
//! # struct MyUi;
//! # impl UiSurface for MyUi { fn set_ui_visible(&mut self, _: bool) {} }
//! Viewer::builder(MyScene, MyUi)
//!     .with_title("Glance")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use glam::Vec2;
use web_time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    engine::{
        ActionHandler, FrameCapture, FrameScheduler, ImmediateLoader,
        InteractionController, ModelLoader, SchedulerError,
    },
    error::GlanceError,
    input::{AlwaysAttached, MouseButton, PinchRecognizer, RawInput, UiAction},
    options::Options,
    Scene, UiSurface,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder<S: Scene, U: UiSurface> {
    scene: S,
    ui: U,
    options: Option<Options>,
    title: String,
    capture: Option<Box<dyn FrameCapture>>,
    loader: Option<Box<dyn ModelLoader>>,
    actions: Vec<(UiAction, ActionHandler)>,
}

impl<S: Scene, U: UiSurface> ViewerBuilder<S, U> {
    fn new(scene: S, ui: U) -> Self {
        Self {
            scene,
            ui,
            options: None,
            title: "Glance".into(),
            capture: None,
            loader: None,
            actions: Vec::new(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the screenshot capture collaborator.
    #[must_use]
    pub fn with_capture(mut self, capture: Box<dyn FrameCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Set the asset loader. Without one the model counts as ready as soon
    /// as the window exists.
    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn ModelLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Register a handler for a pluggable action.
    #[must_use]
    pub fn with_action(
        mut self,
        action: UiAction,
        handler: impl FnMut() + 'static,
    ) -> Self {
        self.actions.push((action, Box::new(handler)));
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer<S, U> {
        let mut controller = InteractionController::new(
            self.scene,
            self.ui,
            self.options.unwrap_or_default(),
        );
        if let Some(capture) = self.capture {
            controller = controller.with_capture(capture);
        }
        for (action, handler) in self.actions {
            controller.register_action(action, handler);
        }
        Viewer {
            controller,
            title: self.title,
            loader: self
                .loader
                .unwrap_or_else(|| Box::new(ImmediateLoader)),
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window hosting one interaction controller.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer<S: Scene, U: UiSurface> {
    controller: InteractionController<S, U>,
    title: String,
    loader: Box<dyn ModelLoader>,
}

impl<S: Scene, U: UiSurface> Viewer<S, U> {
    /// Start a new builder around the scene and UI collaborators.
    #[must_use]
    pub fn builder(scene: S, ui: U) -> ViewerBuilder<S, U> {
        ViewerBuilder::new(scene, ui)
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    pub fn run(self) -> Result<(), GlanceError> {
        let event_loop = EventLoop::<ViewerEvent>::with_user_event()
            .build()
            .map_err(|e| GlanceError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            controller: self.controller,
            scheduler: WindowScheduler::default(),
            loader: Some(self.loader),
            proxy: event_loop.create_proxy(),
            title: self.title,
            cursor: Vec2::ZERO,
            touches: Vec::new(),
            pinch: PinchRecognizer::new(),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| GlanceError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Events posted back into the loop from collaborators.
#[derive(Debug, Clone, Copy)]
enum ViewerEvent {
    ModelReady,
}

/// Redraw requests as the animation-frame primitive, with a wakeup
/// deadline as the timer fallback.
#[derive(Default)]
struct WindowScheduler {
    window: Option<Arc<Window>>,
    wake_at: Option<Instant>,
}

impl FrameScheduler for WindowScheduler {
    fn request_animation_frame(&mut self) -> Result<(), SchedulerError> {
        let window =
            self.window.as_ref().ok_or(SchedulerError::Unavailable)?;
        window.request_redraw();
        Ok(())
    }

    fn set_timeout(&mut self, delay: Duration) {
        self.wake_at = Some(Instant::now() + delay);
    }
}

/// Internal winit application handler.
struct ViewerApp<S: Scene, U: UiSurface> {
    window: Option<Arc<Window>>,
    controller: InteractionController<S, U>,
    scheduler: WindowScheduler,
    loader: Option<Box<dyn ModelLoader>>,
    proxy: EventLoopProxy<ViewerEvent>,
    title: String,
    cursor: Vec2,
    /// Active touch points in landing order; the first is primary.
    touches: Vec<(u64, Vec2)>,
    pinch: PinchRecognizer,
}

impl<S: Scene, U: UiSurface> ViewerApp<S, U> {
    fn feed(&mut self, raw: RawInput) {
        self.controller
            .handle_input(raw, Instant::now(), &mut AlwaysAttached);
    }

    fn handle_touch(&mut self, touch: Touch) {
        let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);

        match touch.phase {
            TouchPhase::Started => {
                self.touches.push((touch.id, pos));
                let _ = self.pinch.update(&self.touch_positions());
                let primary = self.touches[0].1;
                self.feed(RawInput::TouchStart {
                    touches: self.touches.len() as u32,
                    x: primary.x,
                    y: primary.y,
                });
            }
            TouchPhase::Moved => {
                if let Some(entry) =
                    self.touches.iter_mut().find(|(id, _)| *id == touch.id)
                {
                    entry.1 = pos;
                }
                if let Some(scale) = self.pinch.update(&self.touch_positions())
                {
                    self.feed(RawInput::Pinch { scale });
                }
                let Some(&(_, primary)) = self.touches.first() else {
                    return;
                };
                self.feed(RawInput::TouchMove {
                    touches: self.touches.len() as u32,
                    x: primary.x,
                    y: primary.y,
                });
            }
            TouchPhase::Ended => {
                self.touches.retain(|(id, _)| *id != touch.id);
                let _ = self.pinch.update(&self.touch_positions());
                self.feed(RawInput::TouchEnd {
                    touches: self.touches.len() as u32,
                });
            }
            TouchPhase::Cancelled => {
                self.touches.retain(|(id, _)| *id != touch.id);
                self.pinch.reset();
                self.feed(RawInput::TouchCancel);
            }
        }
    }

    fn touch_positions(&self) -> Vec<Vec2> {
        self.touches.iter().map(|(_, p)| *p).collect()
    }
}

impl<S: Scene, U: UiSurface> ApplicationHandler<ViewerEvent>
    for ViewerApp<S, U>
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes().with_title(&self.title);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        self.controller
            .resize(inner.width.max(1), inner.height.max(1));
        self.scheduler.window = Some(Arc::clone(&window));
        self.window = Some(window);

        if let Some(mut loader) = self.loader.take() {
            let proxy = self.proxy.clone();
            loader.load_model(Box::new(move || {
                if proxy.send_event(ViewerEvent::ModelReady).is_err() {
                    log::warn!("model ready after event loop closed");
                }
            }));
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::ModelReady => {
                self.controller.model_ready(&mut self.scheduler);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.controller
                    .resize(size.width.max(1), size.height.max(1));
            }

            WindowEvent::RedrawRequested => {
                let _ = self.controller.tick(&mut self.scheduler);
            }

            WindowEvent::Focused(focused) => {
                self.controller.set_focused(
                    focused,
                    Instant::now(),
                    &mut AlwaysAttached,
                    &mut self.scheduler,
                );
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let button = MouseButton::from(button);
                let raw = if state == ElementState::Pressed {
                    RawInput::MouseDown {
                        button,
                        x: self.cursor.x,
                        y: self.cursor.y,
                    }
                } else {
                    RawInput::MouseUp { button }
                };
                self.feed(raw);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = cursor;
                self.feed(RawInput::MouseMove {
                    x: cursor.x,
                    y: cursor.y,
                });
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch),

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.feed(RawInput::Wheel { delta });
            }

            WindowEvent::PinchGesture { delta, .. } => {
                let scale = 1.0 + delta as f32;
                self.feed(RawInput::Pinch { scale });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let _ = self.controller.handle_key(&format!("{code:?}"));
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        self.controller.poll_timers(now);

        if self.scheduler.wake_at.is_some_and(|at| at <= now) {
            self.scheduler.wake_at = None;
            let _ = self.controller.tick(&mut self.scheduler);
        }

        let wake = [self.controller.next_timer_deadline(), self.scheduler.wake_at]
            .into_iter()
            .flatten()
            .min();
        event_loop.set_control_flow(
            wake.map_or(ControlFlow::Wait, ControlFlow::WaitUntil),
        );
    }
}
