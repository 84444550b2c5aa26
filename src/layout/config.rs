//! Layout engine tuning parameters

use serde::{Deserialize, Serialize};

use super::geometry::Bounds;

// =============================================================================
// Default Constants
// =============================================================================

/// Default logical canvas width
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Default logical canvas height
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// Inset of the initial placement rectangle
pub const DEFAULT_PADDING: f64 = 80.0;

/// Full span of the random offset applied to initial positions
pub const DEFAULT_INITIAL_JITTER: f64 = 40.0;

/// Full span of the random initial velocity per axis
pub const DEFAULT_INITIAL_SPEED: f64 = 5.0;

/// Smallest node radius
pub const DEFAULT_RADIUS_MIN: f64 = 18.0;

/// Random radius added on top of [`DEFAULT_RADIUS_MIN`]
pub const DEFAULT_RADIUS_SPREAD: f64 = 8.0;

/// Pull toward the canvas center, per unit of offset
pub const DEFAULT_CENTER_STRENGTH: f64 = 0.008;

/// Numerator of the inverse-square repulsion
pub const DEFAULT_REPEL_STRENGTH: f64 = 400.0;

/// Pairs closer than this get doubled repulsion
pub const DEFAULT_MIN_DISTANCE: f64 = 60.0;

/// Extra gap added to the radius sum when testing for overlap
pub const DEFAULT_OVERLAP_MARGIN: f64 = 15.0;

/// Pairs farther apart than this are skipped by the repulsion pass
pub const DEFAULT_CULL_DISTANCE: f64 = 200.0;

/// Spring rest length
pub const DEFAULT_LINK_DISTANCE: f64 = 120.0;

/// Spring constant
pub const DEFAULT_LINK_STRENGTH: f64 = 0.1;

/// Multiplicative velocity decay per tick
pub const DEFAULT_DAMPING: f64 = 0.9;

/// Integration sub-step scalar
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Gap kept between a node's edge and the canvas border
pub const DEFAULT_BOUNDARY_MARGIN: f64 = 10.0;

/// Total |vx| + |vy| below which the layout counts as settled
pub const DEFAULT_SETTLE_THRESHOLD: f64 = 0.03;

/// Hard cap on ticks per run
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Target tick rate of the run loop, in Hz
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Configuration for the force layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub initial_jitter: f64,
    pub initial_speed: f64,
    pub radius_min: f64,
    pub radius_spread: f64,
    pub center_strength: f64,
    pub repel_strength: f64,
    pub min_distance: f64,
    pub overlap_margin: f64,
    pub cull_distance: f64,
    pub link_distance: f64,
    pub link_strength: f64,
    pub damping: f64,
    pub alpha: f64,
    pub boundary_margin: f64,
    pub settle_threshold: f64,
    pub max_iterations: u32,
    pub frame_rate: f64,
    /// Seed for jitter, radii and initial velocity; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
            initial_jitter: DEFAULT_INITIAL_JITTER,
            initial_speed: DEFAULT_INITIAL_SPEED,
            radius_min: DEFAULT_RADIUS_MIN,
            radius_spread: DEFAULT_RADIUS_SPREAD,
            center_strength: DEFAULT_CENTER_STRENGTH,
            repel_strength: DEFAULT_REPEL_STRENGTH,
            min_distance: DEFAULT_MIN_DISTANCE,
            overlap_margin: DEFAULT_OVERLAP_MARGIN,
            cull_distance: DEFAULT_CULL_DISTANCE,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_strength: DEFAULT_LINK_STRENGTH,
            damping: DEFAULT_DAMPING,
            alpha: DEFAULT_ALPHA,
            boundary_margin: DEFAULT_BOUNDARY_MARGIN,
            settle_threshold: DEFAULT_SETTLE_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            frame_rate: DEFAULT_FRAME_RATE,
            seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Same configuration with a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: LayoutConfig = serde_yaml::from_str("width: 1024\nseed: 7\n").unwrap();
        assert_eq!(config.width, 1024.0);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.seed, Some(7));
    }
}
