//! Asteroids and their fragmentation lifecycle
//!
//! An asteroid keeps the speed it was given at spawn/split time as a
//! baseline; every tick its velocity magnitude is rescaled to that baseline
//! times the current speed-growth multiplier, keeping its direction.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Arena, Body};
use super::collision::{BounceResult, bounce};
use super::state::EntityIds;
use crate::rotate_degrees;
use crate::settings::{AsteroidSettings, SplitSettings};

/// A drifting asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub body: Body,
    /// Seconds of invulnerability left, never negative
    pub invulnerable_timer: f32,
    /// Baseline speed fixed at spawn or split time
    pub initial_speed: f32,
    /// Split generations since the original spawn
    pub fragmentation_depth: u32,
    alive: bool,
}

/// Everything a split needs besides the asteroid itself
pub struct SplitContext<'a> {
    pub ids: &'a mut EntityIds,
    pub rng: &'a mut Pcg32,
    pub asteroid: &'a AsteroidSettings,
    pub split: &'a SplitSettings,
    /// New fragments, appended to the world after the current pass
    pub fragments: &'a mut Vec<Asteroid>,
}

impl Asteroid {
    pub fn new(id: u32, body: Body, invulnerable_secs: f32) -> Self {
        Self {
            id,
            body,
            invulnerable_timer: invulnerable_secs.max(0.0),
            initial_speed: body.velocity.length(),
            fragmentation_depth: 0,
            alive: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Shots and asteroid collisions only affect vulnerable asteroids
    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        self.invulnerable_timer <= 0.0
    }

    #[inline]
    pub fn check_collision(&self, other: &Body) -> bool {
        self.body.check_collision(other)
    }

    /// Elastic response against another asteroid, radius as mass
    pub fn bounce(&mut self, other: &mut Asteroid) -> BounceResult {
        bounce(&mut self.body, &mut other.body)
    }

    /// Destroy this asteroid and emit its fragments into `ctx.fragments`.
    ///
    /// Returns the number of fragments produced; asteroids at or below the
    /// minimum radius produce none.
    pub fn split(&mut self, ctx: &mut SplitContext<'_>) -> usize {
        self.kill();

        if self.body.radius <= ctx.asteroid.min_radius {
            return 0;
        }
        let radius = self.body.radius - ctx.split.radius_decrement;
        if radius < ctx.asteroid.min_radius {
            log::debug!(
                "Asteroid {} (r={}) would split below min radius, destroyed",
                self.id,
                self.body.radius
            );
            return 0;
        }

        let angle = ctx.rng.random_range(ctx.split.angle_min..=ctx.split.angle_max);
        let boosted = self.body.velocity * ctx.split.speedup;
        let speed = boosted.length();

        for &direction in &ctx.split.directions {
            let velocity = rotate_degrees(boosted, angle * direction);
            let body = Body::new(self.body.position, velocity, radius);
            let mut fragment = Asteroid::new(ctx.ids.next_id(), body, ctx.asteroid.invulnerable_secs);
            fragment.initial_speed = speed;
            fragment.fragmentation_depth = self.fragmentation_depth + 1;
            ctx.fragments.push(fragment);
        }

        log::debug!(
            "Asteroid {} split into {} fragments (r={}, depth={})",
            self.id,
            ctx.split.directions.len(),
            radius,
            self.fragmentation_depth + 1
        );
        ctx.split.directions.len()
    }

    /// Count down invulnerability, rescale speed, advance position
    pub fn update(&mut self, dt: f32, speed_multiplier: f32) {
        self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);

        if self.body.velocity != Vec2::ZERO {
            let speed = self.initial_speed * speed_multiplier;
            self.body.velocity = self.body.velocity.normalize() * speed;
        }

        self.body.integrate(dt);
    }

    /// Fully outside the arena grown by radius + margin
    pub fn is_out_of_play(&self, arena: &Arena, margin: f32) -> bool {
        arena.is_outside(self.body.position, self.body.radius, self.body.radius + margin)
    }
}
