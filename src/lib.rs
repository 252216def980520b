//! Tilt Maze - a ball rolling over a rasterized maze board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision field, body integration, checkpoints)
//! - `settings`: JSON configuration injected into the simulation
//! - `input`: Tilt sources feeding accelerations into each tick

pub mod input;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Default fixed tick duration (ms)
    pub const TICK_MS: u32 = 20;
    /// Maximum ticks run per rendered frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;

    /// Hard bound on substep loop iterations within a single tick
    pub const MAX_SUBSTEP_ITERATIONS: u32 = 1000;

    /// Board dimensions (pixels)
    pub const GRID_WIDTH: u32 = 800;
    pub const GRID_HEIGHT: u32 = 480;

    /// Ball defaults
    pub const BALL_RADIUS: u32 = 10;
    pub const HOLE_RADIUS: u32 = 12;
    pub const POSITION_STEP: f32 = 0.1;
    pub const ACCELERATION_FACTOR: f32 = 100.0;
    /// Share of the reflected normal component given back on impact
    pub const DAMPING_FACTOR: f32 = 0.8;

    /// Velocity gain along the hole normal each tick
    pub const FUNNEL_PULL: f32 = 10.0;
    /// Share of tangential velocity removed each tick inside a hole area
    pub const FUNNEL_TANGENT_DAMPING: f32 = 0.3;
    /// Hole normal denominator used when the squared norm is exactly zero
    pub const HOLE_NORM_EPSILON: f32 = 0.1;

    /// Minimum displacement along a contact normal that counts as an impact
    pub const IMPACT_THRESHOLD: f32 = 0.1;
    pub const HAPTIC_PULSE_MS: u32 = 100;
    pub const RESPAWN_DELAY_MS: u32 = 500;
}

/// Convert a continuous position to the grid cell containing it.
///
/// Truncates toward zero, so `-0.5` lands in column 0.
#[inline]
pub fn to_cell(pos: Vec2) -> IVec2 {
    IVec2::new(pos.x as i32, pos.y as i32)
}

/// Project `v` onto `axis`. Returns zero for a zero axis.
#[inline]
pub fn project(v: Vec2, axis: Vec2) -> Vec2 {
    let len_sq = axis.length_squared();
    if len_sq == 0.0 {
        return Vec2::ZERO;
    }
    v.dot(axis) / len_sq * axis
}
