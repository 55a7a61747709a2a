//! The player's ship and its shots
//!
//! Every ship movement goes through the configured boundary behavior;
//! the ship only lends its position, radius and rotation to the handler.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Arena, Body};
use super::boundary::{BoundaryContext, Mover};
use super::state::EntityIds;
use crate::settings::{PlayerSettings, ShotSettings};
use crate::{forward_from_rotation, rotation_from_direction, wrap_degrees};

/// How the ship turns toward an aim point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnBehavior {
    /// Snap to the nearest 45 degree step
    Discrete,
    /// Turn toward the target at the configured turn speed
    Smooth,
    /// Snap straight to the target
    #[default]
    MouseFollow,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub radius: f32,
    /// Facing in degrees, 0 faces +y
    pub rotation: f32,
    /// Seconds until the gun can fire again
    pub shot_timer: f32,
}

impl Player {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            rotation: 0.0,
            shot_timer: 0.0,
        }
    }

    /// Collision view (the ship has no momentum of its own)
    pub fn body(&self) -> Body {
        Body::new(self.position, Vec2::ZERO, self.radius)
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        forward_from_rotation(self.rotation)
    }

    /// Turn at the configured rate; negative dt turns the other way
    pub fn rotate(&mut self, dt: f32, settings: &PlayerSettings) {
        self.rotation = wrap_degrees(self.rotation + settings.turn_speed * dt);
    }

    /// Move along the facing direction; negative dt reverses at backward speed
    pub fn thrust(&mut self, dt: f32, settings: &PlayerSettings, arena: &Arena) {
        let speed = if dt > 0.0 {
            settings.forward_speed
        } else {
            settings.backward_speed
        };
        self.move_along(self.forward(), dt * speed, settings, arena);
    }

    /// Move sideways; positive dt strafes to the ship's right
    pub fn strafe(&mut self, dt: f32, settings: &PlayerSettings, arena: &Arena) {
        let forward = self.forward();
        let right = Vec2::new(-forward.y, forward.x);
        self.move_along(right, dt * settings.strafe_speed, settings, arena);
    }

    /// Move in a fixed screen direction regardless of facing
    pub fn move_screen_relative(
        &mut self,
        direction: Vec2,
        dt: f32,
        settings: &PlayerSettings,
        arena: &Arena,
    ) {
        let direction = direction.normalize_or_zero();
        self.move_along(direction, dt * settings.forward_speed, settings, arena);
    }

    /// Turn toward a point according to the configured turn behavior
    pub fn aim_at(&mut self, target: Vec2, dt: f32, settings: &PlayerSettings) {
        let to_target = target - self.position;
        if to_target == Vec2::ZERO {
            return;
        }
        let target_angle = rotation_from_direction(to_target);

        self.rotation = match settings.turn_behavior {
            TurnBehavior::MouseFollow => wrap_degrees(target_angle),
            TurnBehavior::Discrete => wrap_degrees((target_angle / 45.0).round() * 45.0),
            TurnBehavior::Smooth => {
                // Shortest signed difference in (-180, 180]
                let mut diff = wrap_degrees(target_angle - self.rotation);
                if diff > 180.0 {
                    diff -= 360.0;
                }
                let max_turn = settings.turn_speed * dt;
                if diff.abs() <= max_turn {
                    wrap_degrees(target_angle)
                } else {
                    wrap_degrees(self.rotation + max_turn * diff.signum())
                }
            }
        };
    }

    fn move_along(&mut self, direction: Vec2, distance: f32, settings: &PlayerSettings, arena: &Arena) {
        let ctx = BoundaryContext {
            arena: *arena,
            forward_speed: settings.forward_speed,
        };
        let mut mover = Mover {
            position: self.position,
            radius: self.radius,
            rotation: self.rotation,
        };
        settings.boundary.apply(&mut mover, direction, distance, &ctx);
        self.position = mover.position;
        self.rotation = mover.rotation;
    }

    /// Fire from the ship's tip unless the gun is cooling down
    pub fn shoot(
        &mut self,
        settings: &PlayerSettings,
        shot: &ShotSettings,
        ids: &mut EntityIds,
    ) -> Option<Shot> {
        if self.shot_timer > 0.0 {
            return None;
        }

        let forward = self.forward();
        let position = self.position + forward * (self.radius + shot.radius);
        self.shot_timer = settings.shoot_cooldown;

        Some(Shot::new(
            ids.next_id(),
            Body::new(position, forward * shot.speed, shot.radius),
        ))
    }

    pub fn update(&mut self, dt: f32) {
        self.shot_timer = (self.shot_timer - dt).max(0.0);
    }
}

/// A projectile fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: u32,
    pub body: Body,
    alive: bool,
}

impl Shot {
    pub fn new(id: u32, body: Body) -> Self {
        Self {
            id,
            body,
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

    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
    }

    /// Fully outside the arena grown by its own radius
    pub fn is_out_of_play(&self, arena: &Arena) -> bool {
        arena.is_outside(self.body.position, self.body.radius, self.body.radius)
    }
}
