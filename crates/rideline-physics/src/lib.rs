//! Rideline Physics - Deterministic rider simulation over a track of lines
//!
//! Produces one rider state per simulated frame and memoizes them. Track
//! edits report the first frame they may have changed so the camera can
//! invalidate its own per-frame cache from the same point.

mod rider;
mod track;

pub use rider::Rider;
pub use track::{Line, LineId, LineKind, Track, TrackError};

use glam::DVec2;
use rideline_core::{FrameSource, Rect};
use tracing::debug;

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity added to the velocity every frame (y points down)
    pub gravity: DVec2,
    /// Depth below a line's surface in which it still catches the rider
    pub collision_zone: f64,
    /// Fraction of tangential velocity lost on contact
    pub friction: f64,
    /// Push per frame applied by acceleration lines
    pub acceleration: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DVec2::new(0.0, 0.175),
            collision_zone: 10.0,
            friction: 0.0,
            acceleration: 0.1,
        }
    }
}

/// A track plus the lazily computed rider state of every frame played so far
pub struct Simulation {
    /// Configuration
    pub config: PhysicsConfig,
    track: Track,
    /// `frames[0]` is the start state
    frames: Vec<Rider>,
}

impl Simulation {
    /// Create a simulation with default configuration
    pub fn new(track: Track, start: Rider) -> Self {
        Self::with_config(track, start, PhysicsConfig::default())
    }

    /// Create a simulation with custom configuration
    pub fn with_config(track: Track, start: Rider, config: PhysicsConfig) -> Self {
        Self {
            config,
            track,
            frames: vec![start],
        }
    }

    /// Get the track being simulated
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Number of frames currently memoized (always at least the start frame)
    pub fn cached_frames(&self) -> usize {
        self.frames.len()
    }

    /// Rider state at `frame`, simulating forward as needed
    pub fn rider_at(&mut self, frame: usize) -> Rider {
        while self.frames.len() <= frame {
            let last = self.frames[self.frames.len() - 1];
            let next = self.step(&last);
            self.frames.push(next);
        }
        self.frames[frame]
    }

    /// Advance a rider by one frame
    pub fn step(&self, rider: &Rider) -> Rider {
        let mut previous = rider.position;
        let mut position = rider.position + rider.velocity() + self.config.gravity;

        for (_, line) in self.track.lines() {
            if !line.is_solid() {
                continue;
            }

            let normal = line.normal();
            let direction = line.direction();
            let offset = position - line.start;

            // Signed depth: negative once the point is inside the solid side
            let depth = offset.dot(normal);
            if depth >= 0.0 || depth <= -self.config.collision_zone {
                continue;
            }

            let along = offset.dot(direction);
            if along < 0.0 || along > line.length() {
                continue;
            }

            let motion = position - previous;
            if motion.dot(normal) >= 0.0 {
                continue;
            }

            position -= normal * depth;

            let mut tangent = (motion - normal * motion.dot(normal)) * (1.0 - self.config.friction);
            if line.kind == LineKind::Acceleration {
                tangent += direction * self.config.acceleration;
            }
            previous = position - tangent;
        }

        Rider { position, previous }
    }

    /// Add a line. Returns its id and the first frame that may have changed.
    pub fn add_line(&mut self, line: Line) -> Result<(LineId, usize), TrackError> {
        let id = self.track.add_line(line)?;
        let first = self.invalidate_near(line.bounds());
        debug!("Added line {} (invalidated from frame {})", id, first);
        Ok((id, first))
    }

    /// Remove a line. Returns the first frame that may have changed.
    pub fn remove_line(&mut self, id: LineId) -> Result<usize, TrackError> {
        let line = self.track.remove_line(id)?;
        let first = self.invalidate_near(line.bounds());
        debug!("Removed line {} (invalidated from frame {})", id, first);
        Ok(first)
    }

    /// Replace a line's geometry. Returns the first frame that may have changed.
    pub fn move_line(&mut self, id: LineId, line: Line) -> Result<usize, TrackError> {
        let old = self.track.move_line(id, line)?;
        let first = self
            .invalidate_near(old.bounds())
            .min(self.invalidate_near(line.bounds()));
        debug!("Moved line {} (invalidated from frame {})", id, first);
        Ok(first)
    }

    /// Replace the start state. Every simulated frame after it is dropped.
    pub fn set_start(&mut self, start: Rider) -> usize {
        self.frames.clear();
        self.frames.push(start);
        debug!("Rider start moved to {}", start.position);
        1
    }

    /// Drop every frame whose step could have touched `bounds`.
    ///
    /// Frame `i` is computed from frame `i - 1`, and a step moves the point by
    /// at most its speed plus gravity before testing lines within the
    /// collision zone. Lines earlier in id order can push the point up to one
    /// more collision zone before a later line is tested.
    fn invalidate_near(&mut self, bounds: Rect) -> usize {
        let reach = 2.0 * self.config.collision_zone
            + self.config.gravity.length()
            + self.config.acceleration;
        let first = (1..self.frames.len())
            .find(|&i| {
                let before = &self.frames[i - 1];
                bounds
                    .inflate(reach + before.velocity().length())
                    .contains(before.position)
            })
            .unwrap_or(self.frames.len());
        self.frames.truncate(first);
        first
    }
}

impl FrameSource for Simulation {
    type State = Rider;

    fn frame(&mut self, index: usize) -> Rider {
        self.rider_at(index)
    }

    fn frames(&mut self, start: usize, count: usize) -> Vec<Rider> {
        if count == 0 {
            return Vec::new();
        }
        self.rider_at(start + count - 1);
        self.frames[start..start + count].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rideline_core::RiderState;

    fn flat_track() -> Track {
        let mut track = Track::new();
        track
            .add_line(Line::new(DVec2::new(-1000.0, 0.0), DVec2::new(1000.0, 0.0)))
            .unwrap();
        track
    }

    #[test]
    fn test_free_fall() {
        let mut sim = Simulation::new(Track::new(), Rider::at(DVec2::ZERO));
        let rider = sim.frame(2);
        // 0.175 + 0.35
        assert!((rider.position.y - 0.525).abs() < 1e-12);
        assert_eq!(rider.position.x, 0.0);
        assert_eq!(sim.cached_frames(), 3);
    }

    #[test]
    fn test_rider_lands_on_line() {
        let mut sim = Simulation::new(flat_track(), Rider::with_velocity(DVec2::new(0.0, -20.0), DVec2::new(2.0, 0.0)));
        for frame in 0..200 {
            let rider = sim.frame(frame);
            assert!(rider.position.y <= 1e-9, "fell through at frame {frame}");
        }
        let rider = sim.frame(199);
        assert!(rider.position.y.abs() < 1e-9);
        assert!(rider.velocity().x > 1.9);
    }

    #[test]
    fn test_scenery_does_not_collide() {
        let mut track = Track::new();
        track
            .add_line(Line::with_kind(
                DVec2::new(-100.0, 5.0),
                DVec2::new(100.0, 5.0),
                LineKind::Scenery,
            ))
            .unwrap();
        let mut sim = Simulation::new(track, Rider::at(DVec2::ZERO));
        assert!(sim.frame(40).position.y > 5.0);
    }

    #[test]
    fn test_acceleration_line_pushes() {
        let mut track = Track::new();
        track
            .add_line(Line::with_kind(
                DVec2::new(-1000.0, 0.0),
                DVec2::new(1000.0, 0.0),
                LineKind::Acceleration,
            ))
            .unwrap();
        let mut sim = Simulation::new(track, Rider::at(DVec2::new(0.0, -1.0)));
        let rider = sim.frame(50);
        assert!(rider.velocity().x > 1.0);
    }

    #[test]
    fn test_deterministic_replay() {
        let start = Rider::with_velocity(DVec2::new(0.0, -30.0), DVec2::new(3.0, 0.0));
        let mut a = Simulation::new(flat_track(), start);
        let mut b = Simulation::new(flat_track(), start);
        let batch = a.frames(0, 120);
        for (i, rider) in batch.iter().enumerate().rev() {
            assert_eq!(*rider, b.frame(i));
        }
    }

    #[test]
    fn test_edit_far_away_keeps_cache() {
        let mut sim = Simulation::new(flat_track(), Rider::at(DVec2::new(0.0, -1.0)));
        sim.frame(100);
        let (_, first) = sim
            .add_line(Line::new(DVec2::new(5000.0, 0.0), DVec2::new(6000.0, 0.0)))
            .unwrap();
        assert_eq!(first, 101);
        assert_eq!(sim.cached_frames(), 101);
    }

    #[test]
    fn test_edit_in_path_invalidates() {
        let mut sim = Simulation::new(
            Track::new(),
            Rider::with_velocity(DVec2::ZERO, DVec2::new(4.0, 0.0)),
        );
        let before = sim.frame(100);

        // Falling rider crosses y = 50 well after frame 0
        let (id, first) = sim
            .add_line(Line::new(DVec2::new(-10.0, 50.0), DVec2::new(1000.0, 50.0)))
            .unwrap();
        assert!(first > 1 && first < 100);
        assert_eq!(sim.cached_frames(), first);

        let after = sim.frame(100);
        assert_ne!(before, after);
        assert!(after.position.y <= 50.0 + 1e-9);

        let removed_from = sim.remove_line(id).unwrap();
        assert!(removed_from <= first + 1);
        assert_eq!(sim.frame(100), before);
    }

    #[test]
    fn test_edit_near_ridden_line_invalidates() {
        let mut sim = Simulation::new(
            flat_track(),
            Rider::with_velocity(DVec2::ZERO, DVec2::new(2.0, 0.0)),
        );
        sim.frame(199);
        assert!(sim.frame(100).position.y.abs() < 1e-9);

        // 18 units under the surface: reachable once the floor pushes the rider back up
        let (_, first) = sim
            .add_line(Line::new(DVec2::new(100.0, 18.0), DVec2::new(200.0, 18.0)))
            .unwrap();
        // Rider reaches x = 78 on frame 39
        assert_eq!(first, 40);
        assert_eq!(sim.cached_frames(), 40);
    }

    #[test]
    fn test_set_start_resets() {
        let mut sim = Simulation::new(Track::new(), Rider::at(DVec2::ZERO));
        sim.frame(10);
        assert_eq!(sim.set_start(Rider::at(DVec2::new(3.0, 3.0))), 1);
        assert_eq!(sim.cached_frames(), 1);
        assert_eq!(sim.frame(0).calculate_center(), DVec2::new(3.0, 3.0));
    }
}
