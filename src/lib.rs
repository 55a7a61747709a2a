//! Drift Arena - a rectangular asteroid arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boundaries, collisions, spawning, splitting)
//! - `settings`: Data-driven configuration loaded from JSON
//! - `error`: Fatal configuration and dispatch errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::Settings;

use glam::Vec2;

/// Default tuning values
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Player ship defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_TURN_SPEED: f32 = 300.0; // degrees per second
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.3;

    /// Shot defaults
    pub const SHOT_RADIUS: f32 = 5.0;
    pub const SHOT_SPEED: f32 = 500.0;

    /// Asteroid size tiers: radius = tier * ASTEROID_MIN_RADIUS
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_SIZE_TIERS: u32 = 5;
    pub const ASTEROID_MAX_RADIUS: f32 = ASTEROID_MIN_RADIUS * ASTEROID_SIZE_TIERS as f32;
    /// Seconds a fresh asteroid or fragment ignores shots and collisions
    pub const ASTEROID_INVULNERABLE_SECS: f32 = 1.0;
    /// Extra distance past arena + radius before an asteroid is culled
    pub const DESPAWN_MARGIN: f32 = 100.0;

    /// Spawning
    pub const SPAWN_SPEED_MIN: f32 = 40.0;
    pub const SPAWN_SPEED_MAX: f32 = 100.0;
    pub const SPAWN_ANGLE_SPREAD: f32 = 30.0; // degrees either side of inward
    pub const MAX_SPAWN_ATTEMPTS: u32 = 50;
    pub const MAX_SPAWNS_PER_TICK: u32 = 16;

    /// Splitting
    pub const SPLIT_SPEEDUP: f32 = 1.0;
    pub const SPLIT_ANGLE_MIN: f32 = 10.0;
    pub const SPLIT_ANGLE_MAX: f32 = 45.0;

    /// Squared distance below which two bodies count as coincident
    pub const COINCIDENT_EPSILON_SQ: f32 = 1e-6;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit facing vector for a rotation in degrees (0 faces +y, counterclockwise positive)
#[inline]
pub fn forward_from_rotation(rotation: f32) -> Vec2 {
    rotate_degrees(Vec2::Y, rotation)
}

/// Rotate a vector counterclockwise by an angle in degrees
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Rotation in degrees whose facing vector points along `dir`
#[inline]
pub fn rotation_from_direction(dir: Vec2) -> f32 {
    // forward = (-sin r, cos r)
    (-dir.x).atan2(dir.y).to_degrees()
}
