//! Game state and the entity registry
//!
//! The frame loop owns one [`GameState`] and passes it by reference to each
//! phase. Every collection lives here; entities never register themselves.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::body::Arena;
use super::player::{Player, Shot};
use super::spawn::SpawnScheduler;
use crate::error::SimResult;
use crate::settings::Settings;

/// Monotonic entity id allocator, shared by every entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// The ship was hit; the run is over
    GameOver,
}

/// Things that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AsteroidSpawned { id: u32 },
    /// Asteroid destroyed, possibly leaving fragments
    AsteroidSplit { id: u32, fragments: usize },
    AsteroidShot { asteroid_id: u32, shot_id: u32 },
    /// Removed by an asteroid collision, no fragments
    AsteroidDestroyed { id: u32 },
    /// Drifted out of play
    AsteroidDespawned { id: u32 },
    /// Placement gave up after `attempts` overlapping candidates
    SpawnSkipped { attempts: u32 },
    PlayerDestroyed { survival_secs: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawableKind {
    Player,
    Asteroid,
    Shot,
}

/// What a renderer needs to draw one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: DrawableKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Facing in degrees, only for the player
    pub rotation: Option<f32>,
    pub invulnerable: bool,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub arena: Arena,
    /// Single source of randomness for the run
    pub rng: Pcg32,
    pub ids: EntityIds,
    pub player: Player,
    /// Asteroids (sorted by id for determinism)
    pub asteroids: Vec<Asteroid>,
    /// Shots (sorted by id for determinism)
    pub shots: Vec<Shot>,
    pub spawner: SpawnScheduler,
    /// Seconds of game time, drives both growth functions
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Validate `settings` and build a fresh run with the ship at the arena center
    pub fn new(settings: Settings) -> SimResult<Self> {
        settings.validate()?;

        let arena = settings.arena.arena();
        let player = Player::new(arena.size() * 0.5, settings.player.radius);
        log::info!(
            "New game: seed {}, arena {}x{}, boundary {}",
            settings.seed,
            arena.width,
            arena.height,
            settings.player.boundary.as_str()
        );

        Ok(Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            arena,
            ids: EntityIds::default(),
            player,
            asteroids: Vec::new(),
            shots: Vec::new(),
            spawner: SpawnScheduler::default(),
            elapsed: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
            settings,
        })
    }

    /// Current multiplier on every asteroid's baseline speed
    pub fn speed_multiplier(&self) -> SimResult<f32> {
        self.settings.asteroid.speed_growth.evaluate(self.elapsed)
    }

    /// Asteroids that shots and asteroid collisions can affect
    pub fn vulnerable_asteroids(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids
            .iter()
            .filter(|a| a.is_alive() && a.is_vulnerable())
    }

    pub fn live_asteroid_count(&self) -> usize {
        self.asteroids.iter().filter(|a| a.is_alive()).count()
    }

    /// Render snapshot of every live body, player first
    pub fn drawables(&self) -> Vec<Drawable> {
        let mut out = Vec::with_capacity(1 + self.asteroids.len() + self.shots.len());

        if self.phase != GamePhase::GameOver {
            out.push(Drawable {
                kind: DrawableKind::Player,
                position: self.player.position,
                velocity: Vec2::ZERO,
                radius: self.player.radius,
                rotation: Some(self.player.rotation),
                invulnerable: false,
            });
        }

        out.extend(self.asteroids.iter().filter(|a| a.is_alive()).map(|a| Drawable {
            kind: DrawableKind::Asteroid,
            position: a.body.position,
            velocity: a.body.velocity,
            radius: a.body.radius,
            rotation: None,
            invulnerable: !a.is_vulnerable(),
        }));

        out.extend(self.shots.iter().filter(|s| s.is_alive()).map(|s| Drawable {
            kind: DrawableKind::Shot,
            position: s.body.position,
            velocity: s.body.velocity,
            radius: s.body.radius,
            rotation: None,
            invulnerable: false,
        }));

        out
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
        self.shots.sort_by_key(|s| s.id);
    }
}
