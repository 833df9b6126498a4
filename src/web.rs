//! Browser host: binds an HTML canvas to an [`InteractionController`].
//!
//! Press listeners (`mousedown`, `touchstart`) live on the canvas for the
//! whole page lifetime. Move and release listeners are added to `window`
//! only while a press is in progress, so a drag that leaves the canvas
//! keeps tracking and ends cleanly. Frames are paced with
//! `requestAnimationFrame`, falling back to `setTimeout`.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use glam::Vec2;
use js_sys::Function;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Blob, Event, EventTarget, HtmlAnchorElement,
    HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent, TouchList, Url,
    WheelEvent, Window,
};
use web_time::{Duration, Instant};

use crate::{
    engine::{
        ActionHandler, CaptureError, FrameCapture, FrameScheduler,
        ImmediateLoader, InteractionController, ModelLoader, SchedulerError,
    },
    error::GlanceError,
    input::{InputSurface, MouseButton, PinchRecognizer, RawInput, UiAction},
    options::Options,
    Scene, UiSurface,
};

/// Install the panic hook and route `log` output to the browser console.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(level) {
        log::warn!("console logger not installed: {e}");
    }
}

fn host_err(e: JsValue) -> GlanceError {
    GlanceError::Host(format!("{e:?}"))
}

fn timeout_ms(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

// ── Host collaborators ───────────────────────────────────────────────────

/// Attaches the window-level move/up listeners for one press.
struct BrowserSurface {
    target: EventTarget,
    session: Vec<(&'static str, Function)>,
}

impl InputSurface for BrowserSurface {
    fn attach_session_listeners(&mut self) {
        for (kind, callback) in &self.session {
            if let Err(e) =
                self.target.add_event_listener_with_callback(kind, callback)
            {
                log::warn!("failed to attach {kind} listener: {e:?}");
            }
        }
    }

    fn detach_session_listeners(&mut self) {
        for (kind, callback) in &self.session {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback(kind, callback)
            {
                log::warn!("failed to detach {kind} listener: {e:?}");
            }
        }
    }
}

/// `requestAnimationFrame` with a `setTimeout` fallback, both calling the
/// same frame callback.
struct BrowserFrameHost {
    window: Window,
    frame: Option<Function>,
}

impl FrameScheduler for BrowserFrameHost {
    fn request_animation_frame(&mut self) -> Result<(), SchedulerError> {
        let frame = self.frame.as_ref().ok_or(SchedulerError::Unavailable)?;
        self.window
            .request_animation_frame(frame)
            .map(|_| ())
            .map_err(|e| SchedulerError::Rejected(format!("{e:?}")))
    }

    fn set_timeout(&mut self, delay: Duration) {
        let Some(frame) = self.frame.as_ref() else {
            return;
        };
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                frame,
                timeout_ms(delay),
            )
        {
            log::error!("frame timeout rejected, loop stalls: {e:?}");
        }
    }
}

/// Saves the canvas as a PNG download.
///
/// The canvas is read synchronously by `toBlob`, right after the capture
/// variant was drawn; encoding and the download finish asynchronously.
pub struct CanvasCapture {
    canvas: HtmlCanvasElement,
}

impl CanvasCapture {
    /// Capture from `canvas`.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl FrameCapture for CanvasCapture {
    fn save_frame(&mut self, file_name: &str) -> Result<(), CaptureError> {
        let file_name = file_name.to_owned();
        let on_blob = Closure::once_into_js(move |blob: JsValue| {
            let Ok(blob) = blob.dyn_into::<Blob>() else {
                log::warn!("screenshot skipped: {}", CaptureError::EmptyImage);
                return;
            };
            match download(&blob, &file_name) {
                Ok(()) => log::info!("screenshot saved as {file_name}"),
                Err(e) => log::warn!("screenshot failed: {e}"),
            }
        });
        self.canvas
            .to_blob(on_blob.unchecked_ref())
            .map_err(|e| CaptureError::Encode(format!("{e:?}")))
    }
}

fn download(blob: &Blob, file_name: &str) -> Result<(), CaptureError> {
    let encode = |e: JsValue| CaptureError::Encode(format!("{e:?}"));
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(CaptureError::Unsupported)?;
    let url = Url::create_object_url_with_blob(blob).map_err(encode)?;
    let anchor = document
        .create_element("a")
        .map_err(encode)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| CaptureError::Unsupported)?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Url::revoke_object_url(&url).map_err(encode)
}

// ── Shared state ─────────────────────────────────────────────────────────

struct Inner<S: Scene, U: UiSurface> {
    controller: InteractionController<S, U>,
    surface: BrowserSurface,
    frames: BrowserFrameHost,
    pinch: PinchRecognizer,
    canvas: HtmlCanvasElement,
    window: Window,
    poll: Option<Function>,
    tap_timeout: Option<i32>,
}

impl<S: Scene, U: UiSurface> Inner<S, U> {
    fn feed(&mut self, raw: RawInput) {
        self.controller
            .handle_input(raw, Instant::now(), &mut self.surface);
        self.arm_tap_timer();
    }

    /// Keep exactly one timeout armed at the classifier's tap deadline.
    fn arm_tap_timer(&mut self) {
        if let Some(id) = self.tap_timeout.take() {
            self.window.clear_timeout_with_handle(id);
        }
        let (Some(deadline), Some(poll)) =
            (self.controller.next_timer_deadline(), self.poll.as_ref())
        else {
            return;
        };
        // +1 ms so the callback never lands just before the deadline.
        let delay = deadline.saturating_duration_since(Instant::now());
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                poll,
                timeout_ms(delay).saturating_add(1),
            ) {
            Ok(id) => self.tap_timeout = Some(id),
            Err(e) => log::warn!("tap timer not armed: {e:?}"),
        }
    }

    fn local(&self, client_x: i32, client_y: i32) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(
            (f64::from(client_x) - rect.left()) as f32,
            (f64::from(client_y) - rect.top()) as f32,
        )
    }

    fn touch_points(&self, touches: &TouchList) -> Vec<Vec2> {
        (0..touches.length())
            .filter_map(|i| touches.item(i))
            .map(|t| self.local(t.client_x(), t.client_y()))
            .collect()
    }

    fn viewport(&self) -> (u32, u32) {
        (
            self.canvas.client_width().max(1) as u32,
            self.canvas.client_height().max(1) as u32,
        )
    }
}

fn with_inner<S: Scene, U: UiSurface>(
    weak: &Weak<RefCell<Inner<S, U>>>,
    f: impl FnOnce(&mut Inner<S, U>),
) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut inner) = shared.try_borrow_mut() else {
        log::warn!("re-entrant browser callback dropped");
        return;
    };
    f(&mut inner);
}

// ── Listeners ────────────────────────────────────────────────────────────

type EventClosure = Closure<dyn FnMut(Event)>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: EventClosure,
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, GlanceError> {
    let closure: EventClosure =
        Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    // Not passive: handlers call preventDefault to suppress scrolling and
    // emulated mouse events.
    let opts = AddEventListenerOptions::new();
    opts.set_passive(false);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        )
        .map_err(host_err)?;
    Ok(Listener {
        target: target.clone(),
        kind,
        closure,
    })
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`WebViewer`].
pub struct WebViewerBuilder<S: Scene, U: UiSurface> {
    canvas: HtmlCanvasElement,
    scene: S,
    ui: U,
    options: Option<Options>,
    capture: Option<Box<dyn FrameCapture>>,
    loader: Option<Box<dyn ModelLoader>>,
    actions: Vec<(UiAction, ActionHandler)>,
}

impl<S: Scene + 'static, U: UiSurface + 'static> WebViewerBuilder<S, U> {
    /// Override the default options. Native double-click is always used
    /// in the browser regardless of this setting.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Replace the default [`CanvasCapture`].
    #[must_use]
    pub fn with_capture(mut self, capture: Box<dyn FrameCapture>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Set the asset loader. Without one the model counts as ready
    /// immediately.
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

    /// Bind every listener and start loading the model.
    pub fn build(self) -> Result<WebViewer<S, U>, GlanceError> {
        let window = web_sys::window()
            .ok_or_else(|| GlanceError::Host("no global window".into()))?;

        let mut options = self.options.unwrap_or_default();
        options.gesture.native_double_click = true;

        let canvas = self.canvas;
        let capture = self
            .capture
            .unwrap_or_else(|| Box::new(CanvasCapture::new(canvas.clone())));
        let mut controller =
            InteractionController::new(self.scene, self.ui, options)
                .with_capture(capture);
        for (action, handler) in self.actions {
            controller.register_action(action, handler);
        }

        let window_target: EventTarget = window.clone().into();
        let inner = Rc::new(RefCell::new(Inner {
            controller,
            surface: BrowserSurface {
                target: window_target.clone(),
                session: Vec::new(),
            },
            frames: BrowserFrameHost {
                window: window.clone(),
                frame: None,
            },
            pinch: PinchRecognizer::new(),
            canvas: canvas.clone(),
            window: window.clone(),
            poll: None,
            tap_timeout: None,
        }));
        let weak = Rc::downgrade(&inner);

        let frame = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move || {
                with_inner(&weak, |inner| {
                    let _ = inner.controller.tick(&mut inner.frames);
                });
            }) as Box<dyn FnMut()>)
        };
        let poll = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move || {
                with_inner(&weak, |inner| {
                    inner.tap_timeout = None;
                    inner.controller.poll_timers(Instant::now());
                    inner.arm_tap_timer();
                });
            }) as Box<dyn FnMut()>)
        };

        let session = session_closures(&weak);
        {
            let mut shared = inner.borrow_mut();
            let (width, height) = shared.viewport();
            shared.controller.resize(width, height);
            shared.frames.frame =
                Some(frame.as_ref().unchecked_ref::<Function>().clone());
            shared.poll =
                Some(poll.as_ref().unchecked_ref::<Function>().clone());
            shared.surface.session = session
                .iter()
                .map(|(kind, c)| {
                    (*kind, c.as_ref().unchecked_ref::<Function>().clone())
                })
                .collect();
        }

        let canvas_target: EventTarget = canvas.into();
        let listeners = bind_listeners(&weak, &canvas_target, &window_target)?;

        let mut loader =
            self.loader.unwrap_or_else(|| Box::new(ImmediateLoader));
        let ready = weak.clone();
        loader.load_model(Box::new(move || {
            with_inner(&ready, |inner| {
                inner.controller.model_ready(&mut inner.frames);
            });
        }));

        Ok(WebViewer {
            inner,
            listeners,
            session: session.into_iter().map(|(_, c)| c).collect(),
            frame: Some(frame),
            poll: Some(poll),
        })
    }
}

fn session_closures<S: Scene + 'static, U: UiSurface + 'static>(
    weak: &Weak<RefCell<Inner<S, U>>>,
) -> Vec<(&'static str, EventClosure)> {
    let wrap = |handler: Box<dyn FnMut(Event)>| -> EventClosure {
        Closure::wrap(handler)
    };

    let mousemove = {
        let weak = weak.clone();
        wrap(Box::new(move |event: Event| {
            let Some(e) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            with_inner(&weak, |inner| {
                let p = inner.local(e.client_x(), e.client_y());
                inner.feed(RawInput::MouseMove { x: p.x, y: p.y });
            });
        }))
    };
    let mouseup = {
        let weak = weak.clone();
        wrap(Box::new(move |event: Event| {
            let Some(e) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let button = MouseButton::from_dom(e.button());
            with_inner(&weak, |inner| inner.feed(RawInput::MouseUp { button }));
        }))
    };
    let touchmove = {
        let weak = weak.clone();
        wrap(Box::new(move |event: Event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let touches = e.touches();
            with_inner(&weak, |inner| {
                let Some(primary) = inner.touch_points(&touches).first().copied()
                else {
                    return;
                };
                inner.feed(RawInput::TouchMove {
                    touches: touches.length(),
                    x: primary.x,
                    y: primary.y,
                });
            });
        }))
    };
    let touchend = {
        let weak = weak.clone();
        wrap(Box::new(move |event: Event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let touches = e.touches().length();
            with_inner(&weak, |inner| inner.feed(RawInput::TouchEnd { touches }));
        }))
    };
    let touchcancel = {
        let weak = weak.clone();
        wrap(Box::new(move |_event: Event| {
            with_inner(&weak, |inner| inner.feed(RawInput::TouchCancel));
        }))
    };

    vec![
        ("mousemove", mousemove),
        ("mouseup", mouseup),
        ("touchmove", touchmove),
        ("touchend", touchend),
        ("touchcancel", touchcancel),
    ]
}

fn bind_listeners<S: Scene + 'static, U: UiSurface + 'static>(
    weak: &Weak<RefCell<Inner<S, U>>>,
    canvas: &EventTarget,
    window: &EventTarget,
) -> Result<Vec<Listener>, GlanceError> {
    let mut listeners = Vec::new();

    let w = weak.clone();
    listeners.push(listen(canvas, "mousedown", move |event| {
        let Some(e) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let button = MouseButton::from_dom(e.button());
        with_inner(&w, |inner| {
            let p = inner.local(e.client_x(), e.client_y());
            inner.feed(RawInput::MouseDown { button, x: p.x, y: p.y });
        });
    })?);

    let w = weak.clone();
    listeners.push(listen(canvas, "touchstart", move |event| {
        let Some(e) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        event.prevent_default();
        let touches = e.touches();
        with_inner(&w, |inner| {
            let points = inner.touch_points(&touches);
            let _ = inner.pinch.update(&points);
            let Some(primary) = points.first().copied() else {
                return;
            };
            inner.feed(RawInput::TouchStart {
                touches: touches.length(),
                x: primary.x,
                y: primary.y,
            });
        });
    })?);

    // Pinch runs beside the single-pointer session on the canvas itself.
    let w = weak.clone();
    listeners.push(listen(canvas, "touchmove", move |event| {
        let Some(e) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        event.prevent_default();
        let touches = e.touches();
        with_inner(&w, |inner| {
            let points = inner.touch_points(&touches);
            if let Some(scale) = inner.pinch.update(&points) {
                inner.feed(RawInput::Pinch { scale });
            }
        });
    })?);

    let w = weak.clone();
    listeners.push(listen(canvas, "touchend", move |event| {
        let Some(e) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        let touches = e.touches();
        with_inner(&w, |inner| {
            let points = inner.touch_points(&touches);
            let _ = inner.pinch.update(&points);
        });
    })?);

    let w = weak.clone();
    listeners.push(listen(canvas, "wheel", move |event| {
        let Some(e) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        event.prevent_default();
        let delta = -e.delta_y() as f32;
        with_inner(&w, |inner| inner.feed(RawInput::Wheel { delta }));
    })?);

    let w = weak.clone();
    listeners.push(listen(canvas, "dblclick", move |_event| {
        with_inner(&w, |inner| inner.feed(RawInput::DoubleClick));
    })?);

    let w = weak.clone();
    listeners.push(listen(window, "keydown", move |event| {
        let Some(e) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if e.repeat() {
            return;
        }
        with_inner(&w, |inner| {
            if inner.controller.handle_key(&e.code()) {
                event.prevent_default();
            }
        });
    })?);

    for (kind, focused) in [("focus", true), ("blur", false)] {
        let w = weak.clone();
        listeners.push(listen(window, kind, move |_event| {
            with_inner(&w, |inner| {
                inner.controller.set_focused(
                    focused,
                    Instant::now(),
                    &mut inner.surface,
                    &mut inner.frames,
                );
                inner.arm_tap_timer();
            });
        })?);
    }

    let w = weak.clone();
    listeners.push(listen(window, "resize", move |_event| {
        with_inner(&w, |inner| {
            let (width, height) = inner.viewport();
            inner.controller.resize(width, height);
        });
    })?);

    Ok(listeners)
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A canvas bound to one interaction controller.
///
/// Dropping it unbinds every listener and stops the loop. Call
/// [`forget`](Self::forget) to keep it alive for the page lifetime.
pub struct WebViewer<S: Scene, U: UiSurface> {
    inner: Rc<RefCell<Inner<S, U>>>,
    listeners: Vec<Listener>,
    session: Vec<EventClosure>,
    frame: Option<Closure<dyn FnMut()>>,
    poll: Option<Closure<dyn FnMut()>>,
}

impl<S: Scene + 'static, U: UiSurface + 'static> WebViewer<S, U> {
    /// Start a builder for `canvas`.
    #[must_use]
    pub fn builder(
        canvas: HtmlCanvasElement,
        scene: S,
        ui: U,
    ) -> WebViewerBuilder<S, U> {
        WebViewerBuilder {
            canvas,
            scene,
            ui,
            options: None,
            capture: None,
            loader: None,
            actions: Vec::new(),
        }
    }

    /// Run `f` against the controller. Returns `None` when called from
    /// inside one of the viewer's own callbacks.
    pub fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut InteractionController<S, U>) -> R,
    ) -> Option<R> {
        let mut inner = self.inner.try_borrow_mut().ok()?;
        Some(f(&mut inner.controller))
    }

    /// Leak the viewer so its listeners live as long as the page.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl<S: Scene, U: UiSurface> Drop for WebViewer<S, U> {
    fn drop(&mut self) {
        for listener in &self.listeners {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.surface.detach_session_listeners();
            inner.controller.pause();
            if let Some(id) = inner.tap_timeout.take() {
                inner.window.clear_timeout_with_handle(id);
            }
        }
        self.session.clear();
        // A frame or timeout may already be queued; leak those two
        // closures so the late call finds a dead weak ref instead of a
        // freed closure.
        if let Some(frame) = self.frame.take() {
            frame.forget();
        }
        if let Some(poll) = self.poll.take() {
            poll.forget();
        }
    }
}
