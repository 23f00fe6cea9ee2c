//! Camera motion strategies
//!
//! A strategy turns the accumulated camera offset of one frame plus the
//! rider's motion into the offset of the next frame. Offsets live in a region
//! centered on the origin.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingRegion;

/// Share of outward motion kept when the offset is at the center
const PUSH: f64 = 0.8;
/// Share of outward motion always kept, however close to the edge
const MIN_PUSH: f64 = 0.05;
/// Fraction of the offset length pulled back toward the center every frame
const PULL: f64 = 0.01;

/// Camera motion algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraStrategy {
    /// Hard clamp into the dead zone
    Clamped,
    /// Elastic clamp that lags behind the rider
    #[default]
    Soft,
    /// Clamp that leans toward where the rider is about to be
    Predictive,
}

impl CameraStrategy {
    /// Offset for the next frame
    pub fn step(self, region: &BoundingRegion, previous: DVec2, motion: DVec2) -> DVec2 {
        match self {
            CameraStrategy::Clamped | CameraStrategy::Predictive => {
                clamped_step(region, previous, motion)
            }
            CameraStrategy::Soft => soft_step(region, previous, motion),
        }
    }

    /// Whether frame lookups need frames beyond the one asked for
    pub fn looks_ahead(self) -> bool {
        matches!(self, CameraStrategy::Predictive)
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            CameraStrategy::Clamped => "Clamped",
            CameraStrategy::Soft => "Soft",
            CameraStrategy::Predictive => "Predictive",
        }
    }
}

/// Accumulate the motion and pull the result into the region
pub fn clamped_step(region: &BoundingRegion, previous: DVec2, motion: DVec2) -> DVec2 {
    region.clamp(previous + motion)
}

/// Damped version of `clamped_step`.
///
/// Outward growth keeps `max(0.05, 0.8 * (1 - |previous| / edge))` of the
/// naive change, and every frame the length relaxes 1% toward the center.
pub fn soft_step(region: &BoundingRegion, previous: DVec2, motion: DVec2) -> DVec2 {
    let naive = clamped_step(region, previous, motion);
    let (angle, mut length) = to_polar(naive);
    let previous_length = previous.length();

    if length > previous_length {
        let edge = region.radius_along(DVec2::from_angle(angle));
        let proximity = if edge > 0.0 {
            (previous_length / edge).min(1.0)
        } else {
            1.0
        };
        let push = (PUSH * (1.0 - proximity)).max(MIN_PUSH);
        length = previous_length + (length - previous_length) * push;
    }

    length -= length * PULL;
    region.clamp(from_polar(angle, length))
}

/// Angle and length. The zero vector has angle 0.
fn to_polar(v: DVec2) -> (f64, f64) {
    if v == DVec2::ZERO {
        return (0.0, 0.0);
    }
    (v.y.atan2(v.x), v.length())
}

fn from_polar(angle: f64, length: f64) -> DVec2 {
    DVec2::from_angle(angle) * length
}
