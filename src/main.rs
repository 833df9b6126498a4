//! Gesture inspector: opens a blank window and logs every command the
//! interaction layer dispatches.
//!
//! Usage: `glance [options.toml]`. Run with `RUST_LOG=debug` to see frame
//! counts and `RUST_LOG=trace` for the raw gesture stream.

use std::path::Path;

use glam::Vec2;
use glance::{input::UiAction, GlanceError, Options, Scene, UiSurface, Viewer};

/// Scene that draws nothing and logs what it was asked to do.
#[derive(Default)]
struct LogScene {
    frames: u64,
}

impl Scene for LogScene {
    fn drag_view(&mut self, delta: Vec2) {
        log::info!("drag ({:.1}, {:.1})", delta.x, delta.y);
    }

    fn zoom(&mut self, direction: f32) {
        log::info!("zoom {direction:+}");
    }

    fn render(&mut self) {
        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!("{} frames rendered", self.frames);
        }
    }

    fn render_capture_variant(&mut self) {
        log::info!("render capture variant");
    }

    fn update_viewport(&mut self, width: u32, height: u32) {
        log::info!("viewport {width}x{height}");
    }
}

struct LogUi;

impl UiSurface for LogUi {
    fn set_ui_visible(&mut self, visible: bool) {
        log::info!("ui {}", if visible { "shown" } else { "hidden" });
    }

    fn click(&mut self, position: Vec2) {
        log::info!("click at ({:.1}, {:.1})", position.x, position.y);
    }
}

fn main() -> Result<(), GlanceError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };

    Viewer::builder(LogScene::default(), LogUi)
        .with_title("Glance gesture inspector")
        .with_options(options)
        .with_action(UiAction::NextModel, || log::info!("next model"))
        .with_action(UiAction::Share, || log::info!("share"))
        .build()
        .run()
}
