//! Shared utilities: frame timing and the cancellable tap timer.

/// Smoothed FPS and per-frame render cost.
pub mod frame_timing;
/// Deadline for the tap-disambiguation window.
pub mod timer;
