//! Camera configuration

use serde::{Deserialize, Serialize};

use crate::strategy::CameraStrategy;

/// How the dead zone is sized and shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionSizing {
    /// Fixed-size rectangle
    Legacy,
    /// Speed-scaled rounded rectangle
    #[default]
    Smooth,
}

/// Camera configuration, owned and persisted by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Dead zone sizing mode
    pub sizing: RegionSizing,
    /// Scale the smooth dead zone with rider speed (otherwise fixed ratio)
    pub dynamic_scaling: bool,
    /// Active motion strategy
    pub strategy: CameraStrategy,
    /// Frames between memoized offset checkpoints
    pub checkpoint_interval: usize,
    /// Frames the predictive strategy looks ahead
    pub lookahead: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sizing: RegionSizing::Smooth,
            dynamic_scaling: true,
            strategy: CameraStrategy::Soft,
            checkpoint_interval: 40,
            lookahead: 40,
        }
    }
}

impl CameraConfig {
    /// Legacy fixed rectangle with the plain clamp strategy
    pub fn legacy() -> Self {
        Self {
            sizing: RegionSizing::Legacy,
            dynamic_scaling: false,
            strategy: CameraStrategy::Clamped,
            ..Default::default()
        }
    }

    /// Same config with another strategy
    pub fn with_strategy(self, strategy: CameraStrategy) -> Self {
        Self { strategy, ..self }
    }

    /// Same config with another sizing mode
    pub fn with_sizing(self, sizing: RegionSizing) -> Self {
        Self { sizing, ..self }
    }
}
