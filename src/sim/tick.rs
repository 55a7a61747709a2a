//! Fixed timestep simulation tick
//!
//! One call runs the frame phases in order: collisions, update, despawn.
//! Destructive passes only flag entities dead and collect new ones; the
//! collections change between phases, never while being iterated.

use glam::Vec2;

use super::asteroid::{Asteroid, SplitContext};
use super::collision::{CollisionEffect, resolve_asteroid_collisions};
use super::spawn::SpawnContext;
use super::state::{GameEvent, GamePhase, GameState};
use crate::error::SimResult;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turn rate in [-1, 1]; positive turns counterclockwise
    pub turn: f32,
    /// Thrust in [-1, 1]; negative reverses
    pub thrust: f32,
    /// Strafe in [-1, 1]; positive strafes right
    pub strafe: f32,
    /// Screen-space movement direction, independent of facing
    pub screen_move: Option<Vec2>,
    /// Point to turn toward (mouse position)
    pub aim_target: Option<Vec2>,
    pub shoot: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one timestep.
///
/// Fails only on fatal configuration errors (a speed or spawn-rate growth
/// function that cannot be evaluated, or a spawn rate that is not positive).
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> SimResult<()> {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return Ok(());
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    // === Collisions ===
    if check_player_hit(state) {
        return Ok(());
    }

    let mut fragments = Vec::new();
    resolve_shot_hits(state, &mut fragments);
    if state.settings.collision.enabled {
        resolve_asteroid_pairs(state, &mut fragments);
    }
    state.asteroids.retain(|a| a.is_alive());
    state.shots.retain(|s| s.is_alive());
    state.asteroids.append(&mut fragments);

    // === Update ===
    apply_player_input(state, input, dt);

    let multiplier = state.speed_multiplier()?;
    for asteroid in &mut state.asteroids {
        asteroid.update(dt, multiplier);
    }
    for shot in &mut state.shots {
        shot.update(dt);
    }

    let spawned = run_spawner(state, dt)?;

    // === Despawn ===
    despawn_out_of_play(state);
    for asteroid in &spawned {
        state.events.push(GameEvent::AsteroidSpawned { id: asteroid.id });
    }
    state.asteroids.extend(spawned);
    state.normalize_order();

    state.elapsed += dt;
    state.time_ticks += 1;

    Ok(())
}

/// Any live asteroid touching the ship ends the run
fn check_player_hit(state: &mut GameState) -> bool {
    let ship = state.player.body();
    let hit = state
        .asteroids
        .iter()
        .find(|a| a.is_alive() && a.check_collision(&ship));

    let Some(asteroid) = hit else {
        return false;
    };

    log::info!(
        "Ship hit by asteroid {} after {:.2}s, game over",
        asteroid.id,
        state.elapsed
    );
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::PlayerDestroyed {
        survival_secs: state.elapsed,
    });
    true
}

/// Shots split the first vulnerable asteroid they touch
fn resolve_shot_hits(state: &mut GameState, fragments: &mut Vec<Asteroid>) {
    let GameState {
        settings,
        ids,
        rng,
        asteroids,
        shots,
        events,
        ..
    } = state;
    let mut ctx = SplitContext {
        ids,
        rng,
        asteroid: &settings.asteroid,
        split: &settings.split,
        fragments,
    };

    for asteroid in asteroids.iter_mut() {
        if !(asteroid.is_alive() && asteroid.is_vulnerable()) {
            continue;
        }
        let Some(shot) = shots
            .iter_mut()
            .find(|s| s.is_alive() && asteroid.check_collision(&s.body))
        else {
            continue;
        };

        shot.kill();
        let count = asteroid.split(&mut ctx);
        events.push(GameEvent::AsteroidShot {
            asteroid_id: asteroid.id,
            shot_id: shot.id,
        });
        events.push(GameEvent::AsteroidSplit {
            id: asteroid.id,
            fragments: count,
        });
    }
}

fn resolve_asteroid_pairs(state: &mut GameState, fragments: &mut Vec<Asteroid>) {
    let GameState {
        settings,
        ids,
        rng,
        asteroids,
        events,
        ..
    } = state;
    let mut ctx = SplitContext {
        ids,
        rng,
        asteroid: &settings.asteroid,
        split: &settings.split,
        fragments,
    };

    let report = resolve_asteroid_collisions(asteroids, settings.collision.outcome, &mut ctx);
    if report.pairs > 0 {
        log::debug!(
            "{} asteroid pair(s) collided ({})",
            report.pairs,
            settings.collision.outcome.as_str()
        );
    }

    for effect in report.effects {
        match effect {
            CollisionEffect::Destroyed { id } => events.push(GameEvent::AsteroidDestroyed { id }),
            CollisionEffect::Split { id, fragments } => {
                events.push(GameEvent::AsteroidSplit { id, fragments })
            }
            CollisionEffect::Bounced { .. } => {}
        }
    }
}

fn apply_player_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let GameState {
        settings,
        arena,
        ids,
        player,
        shots,
        ..
    } = state;
    let movement = &settings.player;

    player.update(dt);

    if input.turn != 0.0 {
        player.rotate(input.turn.clamp(-1.0, 1.0) * dt, movement);
    }
    if input.thrust != 0.0 {
        player.thrust(input.thrust.clamp(-1.0, 1.0) * dt, movement, arena);
    }
    if input.strafe != 0.0 {
        player.strafe(input.strafe.clamp(-1.0, 1.0) * dt, movement, arena);
    }
    if let Some(direction) = input.screen_move {
        player.move_screen_relative(direction, dt, movement, arena);
    }
    if let Some(target) = input.aim_target {
        player.aim_at(target, dt, movement);
    }
    if input.shoot {
        if let Some(shot) = player.shoot(movement, &settings.shot, ids) {
            shots.push(shot);
        }
    }
}

fn run_spawner(state: &mut GameState, dt: f32) -> SimResult<Vec<Asteroid>> {
    let GameState {
        settings,
        arena,
        rng,
        ids,
        asteroids,
        spawner,
        events,
        elapsed,
        ..
    } = state;

    let mut spawned = Vec::new();
    let mut ctx = SpawnContext {
        ids,
        rng,
        arena: &*arena,
        asteroid: &settings.asteroid,
        spawn: &settings.spawn,
        existing: asteroids.as_slice(),
        spawned: &mut spawned,
    };
    let report = spawner.update(dt, *elapsed, &mut ctx)?;

    for _ in 0..report.skipped {
        events.push(GameEvent::SpawnSkipped {
            attempts: settings.spawn.max_attempts,
        });
    }
    Ok(spawned)
}

fn despawn_out_of_play(state: &mut GameState) {
    let arena = state.arena;
    let margin = state.settings.asteroid.despawn_margin;

    for asteroid in &mut state.asteroids {
        if asteroid.is_out_of_play(&arena, margin) {
            log::debug!("Asteroid {} left play at {:?}", asteroid.id, asteroid.body.position);
            asteroid.kill();
            state.events.push(GameEvent::AsteroidDespawned { id: asteroid.id });
        }
    }
    state.asteroids.retain(|a| a.is_alive());
    state.shots.retain(|s| s.is_alive() && !s.is_out_of_play(&arena));
}
