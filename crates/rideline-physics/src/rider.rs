//! Point-mass rider state

use glam::DVec2;
use rideline_core::RiderState;
use serde::{Deserialize, Serialize};

/// A single point mass integrated with position Verlet.
///
/// Velocity is implicit: `position - previous`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    /// Position at this frame
    pub position: DVec2,
    /// Position one frame earlier
    pub previous: DVec2,
}

impl Rider {
    /// A rider at rest
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            previous: position,
        }
    }

    /// A rider moving with the given per-frame velocity
    pub fn with_velocity(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            previous: position - velocity,
        }
    }

    /// Displacement over the last frame
    pub fn velocity(&self) -> DVec2 {
        self.position - self.previous
    }
}

impl Default for Rider {
    fn default() -> Self {
        Self::at(DVec2::ZERO)
    }
}

impl RiderState for Rider {
    fn calculate_center(&self) -> DVec2 {
        self.position
    }
}
