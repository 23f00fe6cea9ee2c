//! Rideline Camera - Rider-following camera for a frame-indexed timeline
//!
//! The camera position at any frame is derived from the rider's motion up to
//! that frame, so playback can jump, rewind, and replay without the camera
//! depending on the order frames were viewed in.

mod bounds;
mod cache;
mod config;
mod controller;
mod strategy;

pub use bounds::{smooth_ratio, BoundingRegion, LEGACY_RATIO, MAX_RATIO, MAX_SPEED, MIN_RATIO, MIN_SPEED};
pub use cache::{CameraEntry, FrameCache, IncrementalOffset};
pub use config::{CameraConfig, RegionSizing};
pub use controller::{CameraController, DEFAULT_RENDER_SIZE};
pub use strategy::{clamped_step, soft_step, CameraStrategy};
