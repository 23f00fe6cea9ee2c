//! Playback clock
//!
//! Maps variable wall-clock render ticks onto the fixed simulation frame rate
//! and exposes the sub-frame blend factor used for camera interpolation.

use serde::{Deserialize, Serialize};

/// Simulation frames per second
pub const FRAME_RATE: f64 = 40.0;

/// Configuration for playback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Playback speed multiplier (1.0 = real time)
    pub speed: f64,
    /// Simulation frames per second
    pub frame_rate: f64,
    /// Maximum delta time accepted per update, to avoid huge frame skips
    pub max_delta_time: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            frame_rate: FRAME_RATE,
            max_delta_time: 0.25,
        }
    }
}

/// Playback position in the simulated timeline
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// Configuration
    pub config: PlaybackConfig,
    /// Current simulation frame
    pub frame: usize,
    /// Whether playback is paused
    pub paused: bool,
    /// Total render ticks seen
    pub tick_count: u64,
    /// Seconds accumulated toward the next frame
    accumulator: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            config: PlaybackConfig::default(),
            frame: 0,
            paused: false,
            tick_count: 0,
            accumulator: 0.0,
        }
    }
}

impl PlaybackClock {
    /// Create a new clock with custom config
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    fn frame_duration(&self) -> f64 {
        1.0 / self.config.frame_rate
    }

    /// Feed the raw wall-clock delta of the last render tick
    pub fn update(&mut self, raw_delta: f64) {
        self.tick_count += 1;
        if self.paused {
            return;
        }
        let delta = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.accumulator += delta * self.config.speed;
    }

    /// Consume whole frames from the accumulator. Returns how many were advanced.
    pub fn advance(&mut self) -> usize {
        let duration = self.frame_duration();
        let mut steps = 0;
        while self.accumulator >= duration {
            self.accumulator -= duration;
            steps += 1;
        }
        self.frame += steps;
        steps
    }

    /// Interpolation factor between the previous frame and the current one
    pub fn blend(&self) -> f64 {
        if self.paused {
            return 1.0;
        }
        (self.accumulator / self.frame_duration()).clamp(0.0, 1.0)
    }

    /// Jump to a frame (scrubbing). Partial progress is discarded.
    pub fn seek(&mut self, frame: usize) {
        self.frame = frame;
        self.accumulator = 0.0;
    }

    /// Move one frame back, stopping at frame 0
    pub fn step_back(&mut self) {
        self.seek(self.frame.saturating_sub(1));
    }

    /// Move one frame forward
    pub fn step_forward(&mut self) {
        self.seek(self.frame + 1);
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume playback
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set the playback speed (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_whole_frames() {
        let mut clock = PlaybackClock::default();
        // 60 Hz ticks against a 40 Hz simulation
        clock.update(1.0 / 60.0);
        assert_eq!(clock.advance(), 0);
        assert!((clock.blend() - 2.0 / 3.0).abs() < 1e-9);

        clock.update(1.0 / 60.0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.frame, 1);
        assert!((clock.blend() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_pause_and_speed() {
        let mut clock = PlaybackClock::default();
        clock.pause();
        clock.update(1.0);
        assert_eq!(clock.advance(), 0);
        assert_eq!(clock.blend(), 1.0);

        clock.resume();
        clock.set_speed(-3.0);
        assert_eq!(clock.config.speed, 0.0);
        clock.set_speed(2.0);
        clock.update(0.11);
        assert_eq!(clock.advance(), 8);
    }

    #[test]
    fn test_max_delta_clamped() {
        let mut clock = PlaybackClock::new(PlaybackConfig {
            max_delta_time: 0.26,
            ..Default::default()
        });
        clock.update(10.0);
        assert_eq!(clock.advance(), 10);
    }

    #[test]
    fn test_seek_and_step_back() {
        let mut clock = PlaybackClock::default();
        clock.update(0.01);
        clock.seek(3);
        assert_eq!(clock.frame, 3);
        assert_eq!(clock.blend(), 0.0);

        clock.step_back();
        clock.step_back();
        clock.step_back();
        clock.step_back();
        assert_eq!(clock.frame, 0);

        clock.step_forward();
        assert_eq!(clock.frame, 1);
    }
}
