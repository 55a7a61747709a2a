//! Time-gated, non-overlapping asteroid spawner
//!
//! Candidates enter from a random arena edge, offset by the largest possible
//! radius so they start fully off-screen, and are rejection-sampled against
//! every live asteroid with the same overlap test collisions use.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::body::{Arena, Body};
use super::edge::Edge;
use super::state::EntityIds;
use crate::error::{SimError, SimResult};
use crate::rotate_degrees;
use crate::settings::{AsteroidSettings, SpawnSettings};

/// Accumulates game time and releases spawns at the current rate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Seconds accumulated toward the next spawn; the remainder carries over
    pub spawn_timer: f32,
}

/// Borrowed world pieces a spawn pass reads and writes
pub struct SpawnContext<'a> {
    pub ids: &'a mut EntityIds,
    pub rng: &'a mut Pcg32,
    pub arena: &'a Arena,
    pub asteroid: &'a AsteroidSettings,
    pub spawn: &'a SpawnSettings,
    /// Asteroids already in play; dead ones are ignored
    pub existing: &'a [Asteroid],
    /// Placed candidates, appended to the world after the pass
    pub spawned: &'a mut Vec<Asteroid>,
}

/// Outcome of one scheduler update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: usize,
    /// Spawns dropped because every candidate overlapped
    pub skipped: u32,
}

impl SpawnScheduler {
    /// Advance the timer by `dt` and spawn for every full interval elapsed.
    ///
    /// Fails when the spawn rate at `elapsed` is not positive.
    pub fn update(
        &mut self,
        dt: f32,
        elapsed: f32,
        ctx: &mut SpawnContext<'_>,
    ) -> SimResult<SpawnReport> {
        self.spawn_timer += dt;

        let rate = ctx.spawn.rate_growth.evaluate(elapsed)?;
        if rate.is_nan() || rate <= 0.0 {
            return Err(SimError::NonPositiveSpawnRate { rate, time: elapsed });
        }
        let interval = 1.0 / rate;

        let mut report = SpawnReport::default();
        let mut processed = 0;
        while self.spawn_timer > interval && processed < ctx.spawn.max_spawns_per_tick {
            self.spawn_timer -= interval;
            processed += 1;

            match place_candidate(ctx) {
                Some(asteroid) => {
                    ctx.spawned.push(asteroid);
                    report.spawned += 1;
                }
                None => {
                    log::warn!(
                        "No free spawn position after {} attempts at t={:.2}s, skipping",
                        ctx.spawn.max_attempts,
                        elapsed
                    );
                    report.skipped += 1;
                }
            }
        }

        if self.spawn_timer > interval {
            let dropped = (self.spawn_timer / interval).floor();
            self.spawn_timer = self.spawn_timer.rem_euclid(interval);
            log::warn!(
                "Spawn backlog of {} intervals dropped (dt={:.3}s, cap {} per tick)",
                dropped,
                dt,
                ctx.spawn.max_spawns_per_tick
            );
        }

        Ok(report)
    }
}

/// Rejection-sample a candidate that overlaps no live asteroid
fn place_candidate(ctx: &mut SpawnContext<'_>) -> Option<Asteroid> {
    for _ in 0..ctx.spawn.max_attempts {
        let body = sample_candidate(ctx.rng, ctx.arena, ctx.asteroid, ctx.spawn);

        let overlaps = ctx
            .existing
            .iter()
            .filter(|a| a.is_alive())
            .chain(ctx.spawned.iter())
            .any(|a| a.check_collision(&body));

        if !overlaps {
            let id = ctx.ids.next_id();
            log::debug!(
                "Spawned asteroid {} at {:?} (r={}, v={:?})",
                id,
                body.position,
                body.radius,
                body.velocity
            );
            return Some(Asteroid::new(id, body, ctx.asteroid.invulnerable_secs));
        }
    }
    None
}

fn sample_candidate(
    rng: &mut Pcg32,
    arena: &Arena,
    asteroid: &AsteroidSettings,
    spawn: &SpawnSettings,
) -> Body {
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let speed = rng.random_range(spawn.speed_min..=spawn.speed_max);
    let jitter = rng.random_range(-spawn.angle_spread..=spawn.angle_spread);
    let along: f32 = rng.random_range(0.0..=1.0);
    let tier = rng.random_range(1..=asteroid.size_tiers);

    let offset = asteroid.max_radius();
    let (inward, position) = match edge {
        Edge::Left => (Vec2::X, Vec2::new(-offset, along * arena.height)),
        Edge::Right => (Vec2::NEG_X, Vec2::new(arena.width + offset, along * arena.height)),
        Edge::Top => (Vec2::Y, Vec2::new(along * arena.width, -offset)),
        Edge::Bottom => (Vec2::NEG_Y, Vec2::new(along * arena.width, arena.height + offset)),
    };

    Body::new(
        position,
        rotate_degrees(inward * speed, jitter),
        asteroid.min_radius * tier as f32,
    )
}
