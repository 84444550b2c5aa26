//! Initial node placement
//!
//! Small graphs (up to [`GRID_MAX_NODES`]) are laid out on a grid inside the
//! padded canvas; larger graphs go on up to three concentric rings around the
//! center. Every slot is then jittered and clamped back into the padded area
//! so the simulation never starts from fully overlapping nodes.

use std::f64::consts::PI;

use rand::Rng;

use super::config::LayoutConfig;
use super::geometry::Vec2;

/// Largest node count that still uses grid placement
pub const GRID_MAX_NODES: usize = 10;

/// Number of rings used for larger graphs
pub const RING_COUNT: usize = 3;

/// Ring base radius as a fraction of the shorter canvas side
const RING_BASE_FRACTION: f64 = 0.15;

/// Radius growth per ring, as a fraction of the base radius
const RING_STEP_FRACTION: f64 = 0.8;

/// Deterministic slot for node `index` out of `total`, before jitter
pub fn slot(index: usize, total: usize, config: &LayoutConfig) -> Vec2 {
    if total <= GRID_MAX_NODES {
        grid_slot(index, total, config)
    } else {
        ring_slot(index, total, config)
    }
}

fn grid_slot(index: usize, total: usize, config: &LayoutConfig) -> Vec2 {
    let cols = (total as f64).sqrt().ceil().max(1.0) as usize;
    let rows = total.div_ceil(cols).max(1);
    let col = index % cols;
    let row = index / cols;

    let pad = config.padding;
    let x = pad + (col as f64 * (config.width - 2.0 * pad)) / (cols.max(2) - 1) as f64;
    let y = pad + (row as f64 * (config.height - 2.0 * pad)) / (rows.max(2) - 1) as f64;
    Vec2::new(x, y)
}

fn ring_slot(index: usize, total: usize, config: &LayoutConfig) -> Vec2 {
    let per_ring = total.div_ceil(RING_COUNT);
    let ring = index / per_ring;
    let angle = 2.0 * PI * index as f64 / total as f64;

    let base = config.width.min(config.height) * RING_BASE_FRACTION;
    let radius = base + ring as f64 * base * RING_STEP_FRACTION;
    let center = config.bounds().center();
    Vec2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Slot plus jitter, clamped into the padded canvas
pub fn initial_position<R: Rng + ?Sized>(
    index: usize,
    total: usize,
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec2 {
    let base = slot(index, total, config);
    let bounds = config.bounds();
    Vec2::new(
        bounds.clamp_x(base.x + centered(rng, config.initial_jitter), config.padding),
        bounds.clamp_y(base.y + centered(rng, config.initial_jitter), config.padding),
    )
}

/// Small random starting velocity
pub fn initial_velocity<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> Vec2 {
    Vec2::new(
        centered(rng, config.initial_speed),
        centered(rng, config.initial_speed),
    )
}

/// Random radius in `[radius_min, radius_min + radius_spread)`
pub fn initial_radius<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> f64 {
    config.radius_min + rng.r#gen::<f64>() * config.radius_spread
}

/// Uniform sample in `[-span / 2, span / 2)`
pub(crate) fn centered<R: Rng + ?Sized>(rng: &mut R, span: f64) -> f64 {
    (rng.r#gen::<f64>() - 0.5) * span
}
