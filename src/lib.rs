// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Test modules unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Interaction layer for canvas-hosted 3D viewers.
//!
//! Glance turns raw pointer, touch, wheel and pinch input into
//! disambiguated gestures (tap, drag, double tap, zoom), maps them onto
//! scene and UI commands, and runs a pausable render loop with one-shot
//! screenshot capture.
//!
//! # Key entry points
//!
//! - [`engine::InteractionController`] - owns all interaction state
//! - [`input::InputProcessor`] - normalizer + gesture classifier pipeline
//! - [`engine::RenderLoop`] - run/pause state machine and frame procedure
//! - [`options::Options`] - gesture timing, zoom, pacing, keybindings
//!
//! # Architecture
//!
//! Everything runs on the host's single thread inside event and frame
//! callbacks. Raw input flows normalizer → classifier → dispatcher →
//! [`engine::Scene`] / [`engine::UiSurface`]. The only deferred work is
//! the tap-disambiguation timer, which hosts fire by polling
//! [`engine::InteractionController::poll_timers`].
//!
//! Host adapters bind the core to a browser canvas (`web` feature) or a
//! winit window (`viewer` feature).

pub mod engine;
pub mod error;
pub mod input;
pub mod options;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(feature = "web")]
pub mod web;

pub use engine::{InteractionController, Scene, UiSurface, ViewerCommand};
pub use error::GlanceError;
pub use input::{Gesture, RawInput};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
