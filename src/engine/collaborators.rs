//! Interfaces to the collaborators this layer drives but does not own:
//! the 3D scene, UI chrome, frame capture, metrics, host scheduling, and
//! asset loading.

use std::fmt;

use glam::Vec2;
use web_time::Duration;

/// The 3D scene. Camera math and drawing live behind this trait.
pub trait Scene {
    /// Translate the view by a screen-space delta.
    fn drag_view(&mut self, delta: Vec2);
    /// Zoom one step; `direction` is in `[-1, 1]`, positive = in.
    fn zoom(&mut self, direction: f32);
    /// Draw the normal frame.
    fn render(&mut self);
    /// Draw the capture-safe frame (textures stripped).
    fn render_capture_variant(&mut self);
    /// Viewport changed size.
    fn update_viewport(&mut self, width: u32, height: u32);
}

/// UI chrome around the viewport (panels, stats overlay).
pub trait UiSurface {
    /// Show or hide all UI chrome.
    fn set_ui_visible(&mut self, visible: bool);

    /// A confirmed single tap or click landed at `position`.
    fn click(&mut self, position: Vec2) {
        let _ = position;
    }
}

/// Frame-timing instrumentation.
pub trait FrameMetrics {
    /// Called before any rendering work in a tick.
    fn begin_frame(&mut self);
    /// Called after the normal render in a tick.
    fn end_frame(&mut self);
}

/// Encodes and saves the frame most recently drawn by
/// [`Scene::render_capture_variant`].
pub trait FrameCapture {
    /// Encode the current frame and save it under `file_name`.
    fn save_frame(&mut self, file_name: &str) -> Result<(), CaptureError>;
}

/// Capture collaborator for hosts that cannot save images.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl FrameCapture for NoCapture {
    fn save_frame(&mut self, _file_name: &str) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }
}

/// Host frame pacing.
pub trait FrameScheduler {
    /// Ask the host to call back on the next display refresh.
    fn request_animation_frame(&mut self) -> Result<(), SchedulerError>;
    /// Ask the host to call back after `delay`.
    fn set_timeout(&mut self, delay: Duration);
}

/// Asset collaborator. `on_ready` runs once the model can be rendered.
pub trait ModelLoader {
    /// Start loading; invoke `on_ready` exactly once when done.
    fn load_model(&mut self, on_ready: Box<dyn FnOnce()>);
}

/// Loader for scenes that are ready as soon as they exist.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateLoader;

impl ModelLoader for ImmediateLoader {
    fn load_model(&mut self, on_ready: Box<dyn FnOnce()>) {
        on_ready();
    }
}

/// Why a capture produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The encoder returned no image.
    EmptyImage,
    /// The encoder or writer failed.
    Encode(String),
    /// The host has no capture facility.
    Unsupported,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyImage => write!(f, "capture produced no image"),
            Self::Encode(msg) => write!(f, "capture encode failed: {msg}"),
            Self::Unsupported => {
                write!(f, "frame capture not supported by this host")
            }
        }
    }
}

impl std::error::Error for CaptureError {}

/// Why the host could not schedule an animation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// No animation-frame primitive on this host.
    Unavailable,
    /// The primitive exists but rejected the request.
    Rejected(String),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "animation frames unavailable"),
            Self::Rejected(msg) => {
                write!(f, "animation frame request rejected: {msg}")
            }
        }
    }
}

impl std::error::Error for SchedulerError {}
