//! Circular bodies and the rectangular arena they move in

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fixed-size rectangular simulation bounds, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along each axis
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether a circle of `radius` centered at `pos` lies fully inside on both axes
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        self.contains_x(pos.x, radius) && self.contains_y(pos.y, radius)
    }

    #[inline]
    pub fn contains_x(&self, x: f32, radius: f32) -> bool {
        x >= radius && x <= self.width - radius
    }

    #[inline]
    pub fn contains_y(&self, y: f32, radius: f32) -> bool {
        y >= radius && y <= self.height - radius
    }

    /// Clamp each axis independently into [radius, dimension - radius]
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.max(radius).min(self.width - radius),
            pos.y.max(radius).min(self.height - radius),
        )
    }

    /// True when the body's bounding square lies entirely outside the arena
    /// grown by `buffer` on every side
    pub fn is_outside(&self, pos: Vec2, radius: f32, buffer: f32) -> bool {
        let min = pos - Vec2::splat(radius);
        let max = pos + Vec2::splat(radius);
        max.x < -buffer
            || max.y < -buffer
            || min.x > self.width + buffer
            || min.y > self.height + buffer
    }
}

/// A circular physical entity. The radius doubles as its mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Circle overlap test (touching exactly does not count)
    #[inline]
    pub fn check_collision(&self, other: &Body) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass()
    }

    /// Advance position by velocity over `dt` seconds
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}
