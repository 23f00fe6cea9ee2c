//! Rideline Core - Shared types for the rideline simulator
//!
//! This crate provides the foundational pieces used by every other crate:
//! - Vector math (re-exported from glam, double precision)
//! - `Rect` for viewports and debug bounds
//! - The per-frame rider timeline interface consumed by the camera
//! - The playback clock that maps wall time onto simulation frames

pub mod time;
pub mod timeline;
pub mod types;

pub use glam::DVec2;
pub use time::{PlaybackClock, PlaybackConfig};
pub use timeline::{FrameSource, RiderState};
pub use types::Rect;
