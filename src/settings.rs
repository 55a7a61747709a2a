//! Simulation settings
//!
//! Every tunable the core reads lives here. Settings deserialize from JSON
//! with `#[serde(default)]` at every level, so a file only needs the keys it
//! overrides. Call [`Settings::validate`] before building a game state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::body::Arena;
use crate::sim::boundary::BoundaryBehavior;
use crate::sim::collision::CollisionOutcome;
use crate::sim::growth::GrowthSetting;
use crate::sim::player::TurnBehavior;

/// Arena dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl ArenaSettings {
    pub fn arena(&self) -> Arena {
        Arena::new(self.width, self.height)
    }
}

/// Player ship movement and weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub radius: f32,
    /// Degrees per second
    pub turn_speed: f32,
    pub forward_speed: f32,
    pub backward_speed: f32,
    pub strafe_speed: f32,
    /// Seconds between shots
    pub shoot_cooldown: f32,
    pub boundary: BoundaryBehavior,
    pub turn_behavior: TurnBehavior,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            turn_speed: PLAYER_TURN_SPEED,
            forward_speed: PLAYER_SPEED,
            backward_speed: PLAYER_SPEED,
            strafe_speed: PLAYER_SPEED,
            shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            boundary: BoundaryBehavior::Bounce,
            turn_behavior: TurnBehavior::MouseFollow,
        }
    }
}

/// Projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotSettings {
    pub radius: f32,
    pub speed: f32,
}

impl Default for ShotSettings {
    fn default() -> Self {
        Self {
            radius: SHOT_RADIUS,
            speed: SHOT_SPEED,
        }
    }
}

/// Asteroid shape, lifetime and speed growth
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidSettings {
    /// Smallest radius; asteroids at or below it cannot split
    pub min_radius: f32,
    /// Number of size tiers; spawn radius is tier * min_radius
    pub size_tiers: u32,
    pub invulnerable_secs: f32,
    /// Extra cull distance beyond arena + radius
    pub despawn_margin: f32,
    /// Multiplier on each asteroid's initial speed over game time
    pub speed_growth: GrowthSetting,
}

impl Default for AsteroidSettings {
    fn default() -> Self {
        Self {
            min_radius: ASTEROID_MIN_RADIUS,
            size_tiers: ASTEROID_SIZE_TIERS,
            invulnerable_secs: ASTEROID_INVULNERABLE_SECS,
            despawn_margin: DESPAWN_MARGIN,
            speed_growth: GrowthSetting::exponential(1.0, 0.03),
        }
    }
}

impl AsteroidSettings {
    pub fn max_radius(&self) -> f32 {
        self.min_radius * self.size_tiers as f32
    }
}

/// Spawn cadence and candidate sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Spawns per second over game time; must stay > 0
    pub rate_growth: GrowthSetting,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Degrees of jitter either side of the inward direction
    pub angle_spread: f32,
    pub max_attempts: u32,
    /// Upper bound on spawns processed in one tick
    pub max_spawns_per_tick: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            rate_growth: GrowthSetting::polynomial(&[0.1, 2.0]),
            speed_min: SPAWN_SPEED_MIN,
            speed_max: SPAWN_SPEED_MAX,
            angle_spread: SPAWN_ANGLE_SPREAD,
            max_attempts: MAX_SPAWN_ATTEMPTS,
            max_spawns_per_tick: MAX_SPAWNS_PER_TICK,
        }
    }
}

/// Fragmentation on destruction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    /// Radius lost per split generation
    pub radius_decrement: f32,
    /// Multiplier on the parent velocity
    pub speedup: f32,
    /// Spread angle range in degrees
    pub angle_min: f32,
    pub angle_max: f32,
    /// One fragment per entry; each rotates by angle * multiplier
    pub directions: Vec<f32>,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            radius_decrement: ASTEROID_MIN_RADIUS,
            speedup: SPLIT_SPEEDUP,
            angle_min: SPLIT_ANGLE_MIN,
            angle_max: SPLIT_ANGLE_MAX,
            directions: vec![-1.0, 1.0],
        }
    }
}

/// Asteroid-asteroid collisions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    pub enabled: bool,
    pub outcome: CollisionOutcome,
}

/// Complete simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,
    pub arena: ArenaSettings,
    pub player: PlayerSettings,
    pub shot: ShotSettings,
    pub asteroid: AsteroidSettings,
    pub spawn: SpawnSettings,
    pub split: SplitSettings,
    pub collision: CollisionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: ArenaSettings::default(),
            player: PlayerSettings::default(),
            shot: ShotSettings::default(),
            asteroid: AsteroidSettings::default(),
            spawn: SpawnSettings::default(),
            split: SplitSettings::default(),
            collision: CollisionSettings::default(),
        }
    }
}

fn positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSetting {
            name,
            reason: format!("must be positive and finite, got {}", value),
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSetting {
            name,
            reason: format!("must be non-negative and finite, got {}", value),
        })
    }
}

fn ordered(name: &'static str, min: f32, max: f32) -> SimResult<()> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(SimError::InvalidSetting {
            name,
            reason: format!("range must be finite and ordered, got {}..={}", min, max),
        })
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;

        let p = &self.player;
        positive("player.radius", p.radius)?;
        non_negative("player.turn_speed", p.turn_speed)?;
        non_negative("player.forward_speed", p.forward_speed)?;
        non_negative("player.backward_speed", p.backward_speed)?;
        non_negative("player.strafe_speed", p.strafe_speed)?;
        non_negative("player.shoot_cooldown", p.shoot_cooldown)?;
        if 2.0 * p.radius > self.arena.width.min(self.arena.height) {
            return Err(SimError::InvalidSetting {
                name: "player.radius",
                reason: "must fit inside the arena".into(),
            });
        }

        positive("shot.radius", self.shot.radius)?;
        non_negative("shot.speed", self.shot.speed)?;

        let a = &self.asteroid;
        positive("asteroid.min_radius", a.min_radius)?;
        if a.size_tiers == 0 {
            return Err(SimError::InvalidSetting {
                name: "asteroid.size_tiers",
                reason: "must be at least 1".into(),
            });
        }
        non_negative("asteroid.invulnerable_secs", a.invulnerable_secs)?;
        non_negative("asteroid.despawn_margin", a.despawn_margin)?;
        // Fresh spawns sit max_radius outside the arena and must not be culled at once
        if a.despawn_margin <= a.max_radius() - 2.0 * a.min_radius {
            return Err(SimError::InvalidSetting {
                name: "asteroid.despawn_margin",
                reason: format!(
                    "must exceed max_radius - 2 * min_radius ({})",
                    a.max_radius() - 2.0 * a.min_radius
                ),
            });
        }
        a.speed_growth.validate()?;

        let s = &self.spawn;
        s.rate_growth.validate()?;
        non_negative("spawn.speed_min", s.speed_min)?;
        ordered("spawn.speed", s.speed_min, s.speed_max)?;
        non_negative("spawn.angle_spread", s.angle_spread)?;
        if s.max_attempts == 0 {
            return Err(SimError::InvalidSetting {
                name: "spawn.max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        if s.max_spawns_per_tick == 0 {
            return Err(SimError::InvalidSetting {
                name: "spawn.max_spawns_per_tick",
                reason: "must be at least 1".into(),
            });
        }

        let sp = &self.split;
        positive("split.radius_decrement", sp.radius_decrement)?;
        non_negative("split.speedup", sp.speedup)?;
        ordered("split.angle", sp.angle_min, sp.angle_max)?;
        if sp.directions.iter().any(|d| !d.is_finite()) {
            return Err(SimError::InvalidSetting {
                name: "split.directions",
                reason: "multipliers must be finite".into(),
            });
        }

        Ok(())
    }
}
