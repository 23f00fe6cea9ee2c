//! Camera dead zone
//!
//! The region the rider may occupy without moving the camera. All sizes derive
//! from a 16:9 box built on the host's render width, whatever the window's real
//! aspect, so the dead zone feels the same in every window shape.

use glam::DVec2;
use rideline_core::Rect;

use crate::config::{CameraConfig, RegionSizing};

/// Size ratio of the legacy rectangle
pub const LEGACY_RATIO: f64 = 0.125;
/// Smallest smooth ratio (slow rider, tight tracking)
pub const MIN_RATIO: f64 = 0.125;
/// Largest smooth ratio (fast rider, loose tracking)
pub const MAX_RATIO: f64 = 0.3;
/// Speeds (pixels per frame) below this use `MIN_RATIO`
pub const MIN_SPEED: f64 = 5.0;
/// Speeds (pixels per frame) above this use `MAX_RATIO`
pub const MAX_SPEED: f64 = 75.0;

/// Height / width of the assumed screen
const ASSUMED_ASPECT: f64 = 9.0 / 16.0;
/// Weight of the ellipse in the smooth clamp
const ELLIPSE_WEIGHT: f64 = 0.8;
/// Relative slack when testing a point against a curved boundary
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Smooth sizing ratio for a rider speed in pixels per frame
pub fn smooth_ratio(speed: f64) -> f64 {
    let t = (speed.clamp(MIN_SPEED, MAX_SPEED) - MIN_SPEED) / (MAX_SPEED - MIN_SPEED);
    MIN_RATIO * (1.0 - t) + MAX_RATIO * t
}

/// Rectangular or rounded dead zone around a center point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRegion {
    center: DVec2,
    sizing: RegionSizing,
    /// Set by `setup_legacy` / `setup_smooth`
    half_extents: Option<DVec2>,
}

impl BoundingRegion {
    /// A region that still needs one of the setup calls
    pub fn new(center: DVec2) -> Self {
        Self {
            center,
            sizing: RegionSizing::Legacy,
            half_extents: None,
        }
    }

    /// Build and set up a region according to the camera config.
    ///
    /// `speed_hint` is the rider's on-screen speed in pixels per frame.
    pub fn create(
        center: DVec2,
        zoom: f64,
        render_width: f64,
        speed_hint: f64,
        config: &CameraConfig,
    ) -> Self {
        let mut region = Self::new(center);
        match config.sizing {
            RegionSizing::Legacy => region.setup_legacy(zoom, render_width),
            RegionSizing::Smooth => {
                let speed = config.dynamic_scaling.then_some(speed_hint);
                region.setup_smooth(zoom, render_width, speed);
            }
        }
        region
    }

    /// Fixed-ratio rectangle
    pub fn setup_legacy(&mut self, zoom: f64, render_width: f64) {
        self.sizing = RegionSizing::Legacy;
        self.half_extents = Some(base_size(zoom, render_width) * LEGACY_RATIO / 2.0);
    }

    /// Rounded region scaled by speed. `None` keeps the minimum ratio.
    pub fn setup_smooth(&mut self, zoom: f64, render_width: f64, speed: Option<f64>) {
        let ratio = speed.map_or(MIN_RATIO, smooth_ratio);
        self.sizing = RegionSizing::Smooth;
        self.half_extents = Some(base_size(zoom, render_width) * ratio / 2.0);
    }

    /// Get the region's center
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Get the sizing mode the region was set up with
    pub fn sizing(&self) -> RegionSizing {
        self.sizing
    }

    /// Whether one of the setup calls has run
    pub fn is_setup(&self) -> bool {
        self.half_extents.is_some()
    }

    /// Half width and half height
    pub fn half_extents(&self) -> DVec2 {
        match self.half_extents {
            Some(half) => half,
            None => panic!("BoundingRegion at {} used before setup", self.center),
        }
    }

    /// Bounding rectangle of the dead zone
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.half_extents() * 2.0)
    }

    /// Pull a point into the region
    pub fn clamp(&self, point: DVec2) -> DVec2 {
        let half = self.half_extents();
        let local = point - self.center;
        let clamped = match self.sizing {
            RegionSizing::Legacy => rect_clamp(local, half),
            RegionSizing::Smooth => rounded_clamp(local, half),
        };
        self.center + clamped
    }

    /// True when the point is left untouched by both the rectangle and the
    /// inscribed ellipse
    pub fn intersects(&self, point: DVec2) -> bool {
        let half = self.half_extents();
        let local = point - self.center;
        rect_clamp(local, half) == local && ellipse_clamp(local, half) == local
    }

    /// Distance from the center to where a ray in `direction` leaves the region.
    ///
    /// A zero direction is treated as angle 0.
    pub fn radius_along(&self, direction: DVec2) -> f64 {
        let half = self.half_extents();
        if is_degenerate(half) {
            return 0.0;
        }
        let dir = direction.try_normalize().unwrap_or(DVec2::X);
        let rect = 1.0 / rect_norm(dir, half);
        match self.sizing {
            RegionSizing::Legacy => rect,
            RegionSizing::Smooth => {
                let ellipse = 1.0 / ellipse_norm(dir, half).sqrt();
                rect + (ellipse - rect) * ELLIPSE_WEIGHT
            }
        }
    }
}

fn base_size(zoom: f64, render_width: f64) -> DVec2 {
    assert!(zoom > 0.0, "camera zoom must be positive, got {zoom}");
    DVec2::new(render_width, render_width * ASSUMED_ASPECT).max(DVec2::ZERO) / zoom
}

fn is_degenerate(half: DVec2) -> bool {
    half.x <= 0.0 || half.y <= 0.0
}

/// `max(|x| / hx, |y| / hy)`: 1.0 on the rectangle's edge
fn rect_norm(v: DVec2, half: DVec2) -> f64 {
    (v.x.abs() / half.x).max(v.y.abs() / half.y)
}

/// `(x / hx)^2 + (y / hy)^2`: 1.0 on the ellipse
fn ellipse_norm(v: DVec2, half: DVec2) -> f64 {
    let n = v / half;
    n.dot(n)
}

/// Nearest point inside the rectangle, independently per axis
fn rect_clamp(v: DVec2, half: DVec2) -> DVec2 {
    v.clamp(-half, half)
}

/// Radial projection onto the inscribed ellipse
fn ellipse_clamp(v: DVec2, half: DVec2) -> DVec2 {
    if is_degenerate(half) {
        return DVec2::ZERO;
    }
    let norm = ellipse_norm(v, half);
    if norm <= 1.0 + BOUNDARY_TOLERANCE {
        v
    } else {
        v / norm.sqrt()
    }
}

/// Radial projection onto the boundary between the rectangle and the ellipse,
/// weighted toward the ellipse. Points already within that boundary stay put.
fn rounded_clamp(v: DVec2, half: DVec2) -> DVec2 {
    if is_degenerate(half) {
        return DVec2::ZERO;
    }
    let ellipse = ellipse_norm(v, half);
    if ellipse <= 1.0 + BOUNDARY_TOLERANCE {
        return v;
    }
    let to_rect = 1.0 / rect_norm(v, half);
    let to_ellipse = 1.0 / ellipse.sqrt();
    let scale = to_rect + (to_ellipse - to_rect) * ELLIPSE_WEIGHT;
    if scale >= 1.0 - BOUNDARY_TOLERANCE {
        v
    } else {
        v * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 800.0;

    fn legacy() -> BoundingRegion {
        let mut region = BoundingRegion::new(DVec2::ZERO);
        region.setup_legacy(1.0, WIDTH);
        region
    }

    fn smooth(speed: Option<f64>) -> BoundingRegion {
        let mut region = BoundingRegion::new(DVec2::ZERO);
        region.setup_smooth(1.0, WIDTH, speed);
        region
    }

    fn sample_points() -> Vec<DVec2> {
        let mut points = vec![DVec2::ZERO];
        for i in 0..72 {
            let angle = (i as f64) * std::f64::consts::TAU / 72.0;
            for radius in [1.0, 20.0, 49.0, 50.0, 60.0, 150.0, 1e6] {
                points.push(DVec2::from_angle(angle) * radius);
            }
        }
        points.push(DVec2::new(50.0, 28.125));
        points.push(DVec2::new(-1e9, 3.0));
        points
    }

    #[test]
    fn test_legacy_size_uses_assumed_aspect() {
        let region = legacy();
        assert_eq!(region.half_extents(), DVec2::new(50.0, 28.125));

        // Zooming in shrinks the world-space region
        let mut zoomed = BoundingRegion::new(DVec2::ZERO);
        zoomed.setup_legacy(2.0, WIDTH);
        assert_eq!(zoomed.half_extents(), DVec2::new(25.0, 14.0625));
    }

    #[test]
    fn test_smooth_ratio_range() {
        assert_eq!(smooth_ratio(0.0), MIN_RATIO);
        assert_eq!(smooth_ratio(5.0), MIN_RATIO);
        assert_eq!(smooth_ratio(75.0), MAX_RATIO);
        assert_eq!(smooth_ratio(1000.0), MAX_RATIO);
        let mid = smooth_ratio(40.0);
        assert!((mid - (MIN_RATIO + MAX_RATIO) / 2.0).abs() < 1e-12);

        assert_eq!(smooth(None).half_extents(), legacy().half_extents());
        assert!(smooth(Some(75.0)).half_extents().x > smooth(Some(5.0)).half_extents().x);
    }

    #[test]
    fn test_create_follows_config() {
        let config = CameraConfig::legacy();
        let region = BoundingRegion::create(DVec2::ONE, 1.0, WIDTH, 60.0, &config);
        assert_eq!(region.sizing(), RegionSizing::Legacy);
        assert_eq!(region.center(), DVec2::ONE);

        let config = CameraConfig::default();
        let fast = BoundingRegion::create(DVec2::ZERO, 1.0, WIDTH, 75.0, &config);
        assert_eq!(fast.half_extents().x, WIDTH * MAX_RATIO / 2.0);

        let fixed = CameraConfig {
            dynamic_scaling: false,
            ..CameraConfig::default()
        };
        let region = BoundingRegion::create(DVec2::ZERO, 1.0, WIDTH, 75.0, &fixed);
        assert_eq!(region.half_extents().x, WIDTH * MIN_RATIO / 2.0);
    }

    #[test]
    fn test_legacy_clamp_per_axis() {
        let region = legacy();
        assert_eq!(region.clamp(DVec2::new(10.0, 5.0)), DVec2::new(10.0, 5.0));
        assert_eq!(region.clamp(DVec2::new(80.0, 5.0)), DVec2::new(50.0, 5.0));
        assert_eq!(region.clamp(DVec2::new(-80.0, 100.0)), DVec2::new(-50.0, 28.125));
    }

    #[test]
    fn test_clamp_relative_to_center() {
        let mut region = BoundingRegion::new(DVec2::new(100.0, 100.0));
        region.setup_legacy(1.0, WIDTH);
        assert_eq!(region.clamp(DVec2::ZERO), DVec2::new(50.0, 71.875));
        assert_eq!(region.bounds().min(), DVec2::new(50.0, 71.875));
    }

    #[test]
    fn test_smooth_clamp_inside_untouched() {
        let region = smooth(Some(0.0));
        let inside = DVec2::new(10.0, -5.0);
        assert_eq!(region.clamp(inside), inside);
        assert!(region.intersects(inside));
    }

    #[test]
    fn test_smooth_clamp_blends_toward_ellipse() {
        let region = smooth(Some(0.0));
        let half = region.half_extents();
        let far = DVec2::new(1000.0, 1000.0);
        let clamped = region.clamp(far);

        // On the diagonal ray, between the rectangle corner and the ellipse
        let rect_hit = far / rect_norm(far, half);
        let ellipse_hit = far / ellipse_norm(far, half).sqrt();
        let expected = rect_hit.lerp(ellipse_hit, 0.8);
        assert!((clamped - expected).length() < 1e-9);
        assert!(clamped.length() < rect_hit.length());
        assert!(clamped.length() > ellipse_hit.length());
    }

    #[test]
    fn test_axis_points_match_both_shapes() {
        for region in [legacy(), smooth(Some(0.0))] {
            let clamped = region.clamp(DVec2::new(500.0, 0.0));
            assert_eq!(clamped, DVec2::new(50.0, 0.0));
            assert!(region.intersects(clamped));
        }
    }

    #[test]
    fn test_clamp_idempotent() {
        let regions = [
            legacy(),
            smooth(None),
            smooth(Some(0.0)),
            smooth(Some(30.0)),
            smooth(Some(200.0)),
        ];
        for region in regions {
            for point in sample_points() {
                let once = region.clamp(point);
                assert_eq!(region.clamp(once), once, "{:?} at {point}", region.sizing());
            }
        }
    }

    #[test]
    fn test_intersects_requires_both_shapes() {
        let region = legacy();
        // Rectangle corner lies outside the inscribed ellipse
        let corner = DVec2::new(50.0, 28.125);
        assert_eq!(region.clamp(corner), corner);
        assert!(!region.intersects(corner));
        assert!(!region.intersects(DVec2::new(51.0, 0.0)));
        assert!(region.intersects(DVec2::ZERO));
    }

    #[test]
    fn test_radius_along() {
        let region = legacy();
        assert!((region.radius_along(DVec2::X) - 50.0).abs() < 1e-12);
        assert!((region.radius_along(DVec2::NEG_Y) - 28.125).abs() < 1e-12);
        // Zero direction reads as angle 0
        assert!((region.radius_along(DVec2::ZERO) - 50.0).abs() < 1e-12);

        let rounded = smooth(Some(0.0));
        let diagonal = DVec2::new(1.0, 1.0);
        assert!(rounded.radius_along(diagonal) < region.radius_along(diagonal));
    }

    #[test]
    fn test_degenerate_region() {
        let mut region = BoundingRegion::new(DVec2::new(3.0, 4.0));
        region.setup_smooth(1.0, 0.0, Some(10.0));
        assert_eq!(region.clamp(DVec2::new(100.0, 100.0)), DVec2::new(3.0, 4.0));
        assert_eq!(region.radius_along(DVec2::X), 0.0);
    }

    #[test]
    #[should_panic(expected = "used before setup")]
    fn test_clamp_before_setup_panics() {
        BoundingRegion::new(DVec2::ZERO).clamp(DVec2::ONE);
    }

    #[test]
    #[should_panic(expected = "used before setup")]
    fn test_intersects_before_setup_panics() {
        BoundingRegion::new(DVec2::ZERO).intersects(DVec2::ONE);
    }

    #[test]
    #[should_panic(expected = "zoom must be positive")]
    fn test_zero_zoom_panics() {
        BoundingRegion::new(DVec2::ZERO).setup_legacy(0.0, WIDTH);
    }
}
