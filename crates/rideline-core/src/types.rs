//! Core types used throughout rideline

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (smallest x and y)
    pub position: DVec2,
    /// Width and height
    pub size: DVec2,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(position: DVec2, size: DVec2) -> Self {
        Self { position, size }
    }

    /// Create a rectangle of the given size centered on a point
    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        Self {
            position: center - size / 2.0,
            size,
        }
    }

    /// Smallest corner
    pub fn min(&self) -> DVec2 {
        self.position
    }

    /// Largest corner
    pub fn max(&self) -> DVec2 {
        self.position + self.size
    }

    /// Center point
    pub fn center(&self) -> DVec2 {
        self.position + self.size / 2.0
    }

    /// Get the width
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Get the height
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Check whether a point lies inside or on the edge
    pub fn contains(&self, point: DVec2) -> bool {
        let max = self.max();
        point.x >= self.position.x && point.x <= max.x && point.y >= self.position.y && point.y <= max.y
    }

    /// Grow the rectangle by `amount` on every side
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect {
            position: self.position - DVec2::splat(amount),
            size: self.size + DVec2::splat(amount * 2.0),
        }
    }
}
