//! Arena edges: crossing tests, opposite-edge mapping, wrap transfers and
//! bounce reflection.
//!
//! Each edge is a plain enum variant; every per-edge function is a `match`
//! resolved at compile time. Transfers take the tentative (already moved)
//! position and return the re-entry position on the opposite edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Arena;
use crate::wrap_degrees;

/// One of the arena's four boundary lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Re-entry placement strategy for wrapping behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Snap to the opposite edge, keep the perpendicular coordinate
    Edge,
    /// Re-enter inward by the distance travelled past the boundary
    Momentum,
    /// Re-enter at the perpendicular coordinate where the straight path crossed
    Trajectory,
    /// Keep the perpendicular coordinate as a fraction of the playable extent
    Relative,
}

impl Edge {
    /// Fixed evaluation order for wrap and bounce dispatch
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    pub fn opposite(&self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }

    /// Axis index crossed by this edge (0 = x, 1 = y)
    #[inline]
    fn axis(&self) -> usize {
        match self {
            Edge::Left | Edge::Right => 0,
            Edge::Top | Edge::Bottom => 1,
        }
    }

    /// -1 for the low side of the axis, +1 for the high side
    #[inline]
    fn outward_sign(&self) -> f32 {
        match self {
            Edge::Left | Edge::Top => -1.0,
            Edge::Right | Edge::Bottom => 1.0,
        }
    }

    /// Extreme center coordinate a body of `radius` may occupy against this edge
    pub fn boundary(&self, arena: &Arena, radius: f32) -> f32 {
        match self {
            Edge::Left | Edge::Top => radius,
            Edge::Right => arena.width - radius,
            Edge::Bottom => arena.height - radius,
        }
    }

    /// Whether a body centered at `pos` pokes past this edge
    pub fn is_crossed(&self, arena: &Arena, pos: Vec2, radius: f32) -> bool {
        match self {
            Edge::Left => pos.x < radius,
            Edge::Right => pos.x > arena.width - radius,
            Edge::Top => pos.y < radius,
            Edge::Bottom => pos.y > arena.height - radius,
        }
    }

    /// How far past the boundary `pos` is (positive when crossed)
    pub fn overshoot(&self, arena: &Arena, pos: Vec2, radius: f32) -> f32 {
        let axis = self.axis();
        (pos[axis] - self.boundary(arena, radius)) * self.outward_sign()
    }

    /// Rotation after reflecting off this edge. Left/right are vertical
    /// walls, top/bottom horizontal ones.
    pub fn reflect_rotation(&self, rotation: f32) -> f32 {
        match self {
            Edge::Left | Edge::Right => vertical_wall_bounce(rotation),
            Edge::Top | Edge::Bottom => horizontal_wall_bounce(rotation),
        }
    }

    /// Re-entry position on the opposite edge for a body that crossed this one.
    ///
    /// `velocity` is only read by [`TransferKind::Trajectory`].
    pub fn transfer(
        &self,
        kind: TransferKind,
        arena: &Arena,
        pos: Vec2,
        radius: f32,
        velocity: Vec2,
    ) -> Vec2 {
        match kind {
            TransferKind::Edge => self.edge_transfer(arena, pos, radius),
            TransferKind::Momentum => self.momentum_transfer(arena, pos, radius),
            TransferKind::Trajectory => self.trajectory_transfer(arena, pos, radius, velocity),
            TransferKind::Relative => self.relative_transfer(arena, pos, radius),
        }
    }

    pub fn edge_transfer(&self, arena: &Arena, pos: Vec2, radius: f32) -> Vec2 {
        let mut out = pos;
        out[self.axis()] = self.opposite().boundary(arena, radius);
        out
    }

    pub fn momentum_transfer(&self, arena: &Arena, pos: Vec2, radius: f32) -> Vec2 {
        let overshoot = self.overshoot(arena, pos, radius);
        let entry = self.opposite();
        let mut out = pos;
        // Step inward from the entry edge by the same overshoot
        out[self.axis()] = entry.boundary(arena, radius) - entry.outward_sign() * overshoot;
        out
    }

    pub fn trajectory_transfer(&self, arena: &Arena, pos: Vec2, radius: f32, velocity: Vec2) -> Vec2 {
        let axis = self.axis();
        let perp = 1 - axis;
        let along = velocity[axis];
        if along == 0.0 {
            return self.edge_transfer(arena, pos, radius);
        }

        // Walk back along the path to the point where it met the boundary
        let overshoot = self.overshoot(arena, pos, radius);
        let mut out = pos;
        out[perp] = pos[perp] - overshoot / along.abs() * velocity[perp];
        out[axis] = self.opposite().boundary(arena, radius);
        out
    }

    pub fn relative_transfer(&self, arena: &Arena, pos: Vec2, radius: f32) -> Vec2 {
        let axis = self.axis();
        let perp = 1 - axis;
        let playable = arena.size()[perp] - 2.0 * radius;
        let fraction = if playable > 0.0 {
            ((pos[perp] - radius) / playable).clamp(0.0, 1.0)
        } else {
            0.5
        };

        let mut out = pos;
        out[perp] = radius + fraction * playable.max(0.0);
        out[axis] = self.opposite().boundary(arena, radius);
        out
    }
}

/// Reflection off a horizontal wall (top/bottom): flips the vertical component
#[inline]
pub fn horizontal_wall_bounce(rotation: f32) -> f32 {
    wrap_degrees(180.0 - rotation)
}

/// Reflection off a vertical wall (left/right): flips the horizontal component
#[inline]
pub fn vertical_wall_bounce(rotation: f32) -> f32 {
    wrap_degrees(360.0 - rotation)
}
