//! Engine configuration

use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// Every threshold the engine consults lives here; engine instances are
/// independently configurable with no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Analyze every nth decoded frame
    pub frame_skip: u64,

    /// Stride used by short-clip screening
    pub clip_frame_skip: u64,

    /// Detection confidence threshold for direct camera footage
    pub confidence_threshold: f32,

    /// Detection confidence threshold for screen-recorded footage
    pub screen_confidence_threshold: f32,

    /// Mean vehicle count at which congestion is considered
    pub congestion_vehicle_threshold: u32,

    /// Heuristic speed below which congestion is considered
    pub congestion_speed_threshold: f64,

    /// Stationary vehicle count at which an accident is considered
    pub accident_stationary_threshold: u32,

    /// History window capacity for temporal confirmation
    pub max_history: usize,

    /// Width of the border strips sampled for screen-recording detection (pixels)
    pub border_strip_px: u32,

    /// Border brightness below which a strip counts as dark
    pub dark_border_brightness: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_skip: 5,
            clip_frame_skip: 2,
            confidence_threshold: 0.5,
            screen_confidence_threshold: 0.25,
            congestion_vehicle_threshold: 12,
            congestion_speed_threshold: 8.0,
            accident_stationary_threshold: 2,
            max_history: 30,
            border_strip_px: 10,
            dark_border_brightness: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.frame_skip, 5);
        assert_eq!(config.congestion_vehicle_threshold, 12);
        assert_eq!(config.accident_stationary_threshold, 2);
        assert_eq!(config.max_history, 30);
        assert!(config.screen_confidence_threshold < config.confidence_threshold);
    }
}
