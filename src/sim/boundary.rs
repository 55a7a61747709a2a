//! Boundary policy: what happens when a moving body would cross an arena edge
//!
//! Handlers only see a [`Mover`], a narrow copy of the fields they may read
//! or write (position, radius, rotation), never the owning entity.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Arena;
use super::edge::{Edge, TransferKind};
use crate::error::SimError;
use crate::forward_from_rotation;

/// Data-only view of a body that boundary handlers operate on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub position: Vec2,
    pub radius: f32,
    /// Facing in degrees (0 faces +y)
    pub rotation: f32,
}

/// Fixed inputs shared by every handler call
#[derive(Debug, Clone, Copy)]
pub struct BoundaryContext {
    pub arena: Arena,
    /// Configured forward speed, used to rebuild the velocity for trajectory wraps
    pub forward_speed: f32,
}

/// Movement behaviors at the arena edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryBehavior {
    /// Move without any boundary checks
    PassThrough,
    /// Move first, then constrain (smooth sliding)
    Clamp,
    /// Per-axis movement, blocked axes stay put
    Stick,
    /// Reflect facing off walls
    #[default]
    Bounce,
    /// All-or-nothing: reject the whole move if it leaves the arena
    Check,
    WrapEdge,
    WrapMomentum,
    WrapTrajectory,
    WrapRelative,
}

impl BoundaryBehavior {
    pub const ALL: [BoundaryBehavior; 9] = [
        BoundaryBehavior::PassThrough,
        BoundaryBehavior::Clamp,
        BoundaryBehavior::Stick,
        BoundaryBehavior::Bounce,
        BoundaryBehavior::Check,
        BoundaryBehavior::WrapEdge,
        BoundaryBehavior::WrapMomentum,
        BoundaryBehavior::WrapTrajectory,
        BoundaryBehavior::WrapRelative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryBehavior::PassThrough => "pass_through",
            BoundaryBehavior::Clamp => "clamp",
            BoundaryBehavior::Stick => "stick",
            BoundaryBehavior::Bounce => "bounce",
            BoundaryBehavior::Check => "check",
            BoundaryBehavior::WrapEdge => "wrap_edge",
            BoundaryBehavior::WrapMomentum => "wrap_momentum",
            BoundaryBehavior::WrapTrajectory => "wrap_trajectory",
            BoundaryBehavior::WrapRelative => "wrap_relative",
        }
    }

    /// Transfer strategy for the wrapping variants
    pub fn transfer_kind(&self) -> Option<TransferKind> {
        match self {
            BoundaryBehavior::WrapEdge => Some(TransferKind::Edge),
            BoundaryBehavior::WrapMomentum => Some(TransferKind::Momentum),
            BoundaryBehavior::WrapTrajectory => Some(TransferKind::Trajectory),
            BoundaryBehavior::WrapRelative => Some(TransferKind::Relative),
            _ => None,
        }
    }

    /// Move `mover` by `forward * distance` under this behavior
    pub fn apply(&self, mover: &mut Mover, forward: Vec2, distance: f32, ctx: &BoundaryContext) {
        match self {
            BoundaryBehavior::PassThrough => pass_through(mover, forward, distance),
            BoundaryBehavior::Clamp => clamp(mover, forward, distance, &ctx.arena),
            BoundaryBehavior::Stick => stick(mover, forward, distance, &ctx.arena),
            BoundaryBehavior::Bounce => bounce(mover, forward, distance, &ctx.arena),
            BoundaryBehavior::Check => check(mover, forward, distance, &ctx.arena),
            BoundaryBehavior::WrapEdge
            | BoundaryBehavior::WrapMomentum
            | BoundaryBehavior::WrapTrajectory
            | BoundaryBehavior::WrapRelative => {
                // transfer_kind() is Some for every wrap variant
                if let Some(kind) = self.transfer_kind() {
                    wrap(mover, forward, distance, kind, ctx);
                }
            }
        }
    }
}

impl FromStr for BoundaryBehavior {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        BoundaryBehavior::ALL
            .into_iter()
            .find(|b| b.as_str() == key)
            .ok_or_else(|| SimError::UnknownBehavior {
                kind: "boundary behavior",
                value: s.to_string(),
            })
    }
}

fn pass_through(mover: &mut Mover, forward: Vec2, distance: f32) {
    mover.position += forward * distance;
}

fn clamp(mover: &mut Mover, forward: Vec2, distance: f32, arena: &Arena) {
    let target = mover.position + forward * distance;
    mover.position = arena.clamp(target, mover.radius);
}

fn stick(mover: &mut Mover, forward: Vec2, distance: f32, arena: &Arena) {
    let movement = forward * distance;
    let r = mover.radius;
    // Pull back in first if we start outside
    let current = arena.clamp(mover.position, r);

    let new_x = current.x + movement.x;
    let new_y = current.y + movement.y;
    mover.position = Vec2::new(
        if arena.contains_x(new_x, r) { new_x } else { current.x },
        if arena.contains_y(new_y, r) { new_y } else { current.y },
    );
}

fn check(mover: &mut Mover, forward: Vec2, distance: f32, arena: &Arena) {
    let target = mover.position + forward * distance;
    if arena.contains(target, mover.radius) {
        mover.position = target;
    }
}

fn bounce(mover: &mut Mover, forward: Vec2, distance: f32, arena: &Arena) {
    let target = mover.position + forward * distance;

    // Every edge is tested so a corner hit reflects on both axes
    let mut hit = false;
    for edge in Edge::ALL {
        if edge.is_crossed(arena, target, mover.radius) {
            mover.rotation = edge.reflect_rotation(mover.rotation);
            hit = true;
        }
    }

    if !hit {
        mover.position = target;
        return;
    }

    let reflected = forward_from_rotation(mover.rotation);
    mover.position = arena.clamp(mover.position + reflected * distance, mover.radius);
}

fn wrap(mover: &mut Mover, forward: Vec2, distance: f32, kind: TransferKind, ctx: &BoundaryContext) {
    let target = mover.position + forward * distance;

    // First crossed edge in fixed order wins, not the nearest
    let crossed = Edge::ALL
        .into_iter()
        .find(|edge| edge.is_crossed(&ctx.arena, target, mover.radius));

    mover.position = match crossed {
        Some(edge) => {
            let velocity = forward_from_rotation(mover.rotation) * ctx.forward_speed;
            edge.transfer(kind, &ctx.arena, target, mover.radius, velocity)
        }
        None => target,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap_degrees;
    use proptest::prelude::*;

    const CTX: BoundaryContext = BoundaryContext {
        arena: Arena {
            width: 800.0,
            height: 600.0,
        },
        forward_speed: 200.0,
    };

    fn mover(x: f32, y: f32, rotation: f32) -> Mover {
        Mover {
            position: Vec2::new(x, y),
            radius: 20.0,
            rotation,
        }
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_pass_through_ignores_bounds() {
        let mut m = mover(25.0, 300.0, 0.0);
        BoundaryBehavior::PassThrough.apply(&mut m, Vec2::NEG_X, 100.0, &CTX);
        assert!(approx(m.position, Vec2::new(-75.0, 300.0)));
    }

    #[test]
    fn test_clamp_slides_along_wall() {
        let mut m = mover(25.0, 300.0, 0.0);
        let dir = Vec2::new(-1.0, 1.0).normalize();
        BoundaryBehavior::Clamp.apply(&mut m, dir, 20.0, &CTX);
        assert_eq!(m.position.x, 20.0);
        assert!(m.position.y > 300.0);
    }

    #[test]
    fn test_stick_blocks_only_offending_axis() {
        let mut m = mover(25.0, 300.0, 0.0);
        BoundaryBehavior::Stick.apply(&mut m, Vec2::new(-10.0, 5.0), 1.0, &CTX);
        assert!(approx(m.position, Vec2::new(25.0, 305.0)));
    }

    #[test]
    fn test_stick_pulls_outside_body_back_in() {
        let mut m = mover(-50.0, 300.0, 0.0);
        BoundaryBehavior::Stick.apply(&mut m, Vec2::ZERO, 0.0, &CTX);
        assert!(approx(m.position, Vec2::new(20.0, 300.0)));
    }

    #[test]
    fn test_check_is_all_or_nothing() {
        let mut m = mover(25.0, 300.0, 0.0);
        BoundaryBehavior::Check.apply(&mut m, Vec2::new(-10.0, 5.0), 1.0, &CTX);
        assert!(approx(m.position, Vec2::new(25.0, 300.0)));

        BoundaryBehavior::Check.apply(&mut m, Vec2::new(10.0, 5.0), 1.0, &CTX);
        assert!(approx(m.position, Vec2::new(35.0, 305.0)));
    }

    #[test]
    fn test_bounce_vertical_wall() {
        let rotation = 60.0; // facing left-ish and down
        let mut m = mover(22.0, 300.0, rotation);
        let forward = forward_from_rotation(rotation);
        BoundaryBehavior::Bounce.apply(&mut m, forward, 10.0, &CTX);
        assert!((m.rotation - wrap_degrees(360.0 - rotation)).abs() < 1e-4);
        // Reflected direction now points right
        assert!(m.position.x > 22.0);
    }

    #[test]
    fn test_bounce_horizontal_wall() {
        let rotation = 10.0; // mostly +y (down)
        let mut m = mover(400.0, 578.0, rotation);
        let forward = forward_from_rotation(rotation);
        BoundaryBehavior::Bounce.apply(&mut m, forward, 10.0, &CTX);
        assert!((m.rotation - wrap_degrees(180.0 - rotation)).abs() < 1e-4);
        assert!(m.position.y < 578.0);
    }

    #[test]
    fn test_bounce_corner_applies_both_reflections() {
        let rotation = 135.0; // up-left
        let mut m = mover(21.0, 21.0, rotation);
        let forward = forward_from_rotation(rotation);
        BoundaryBehavior::Bounce.apply(&mut m, forward, 10.0, &CTX);
        let expected = Edge::Top.reflect_rotation(Edge::Left.reflect_rotation(rotation));
        assert!((m.rotation - expected).abs() < 1e-4);
        assert!(CTX.arena.contains(m.position, m.radius));
    }

    #[test]
    fn test_bounce_without_hit_moves_freely() {
        let mut m = mover(400.0, 300.0, 0.0);
        BoundaryBehavior::Bounce.apply(&mut m, Vec2::Y, 10.0, &CTX);
        assert!(approx(m.position, Vec2::new(400.0, 310.0)));
        assert_eq!(m.rotation, 0.0);
    }

    #[test]
    fn test_wrap_edge_left_to_right() {
        let mut m = mover(25.0, 300.0, 90.0);
        BoundaryBehavior::WrapEdge.apply(&mut m, Vec2::NEG_X, 10.0, &CTX);
        assert!(approx(m.position, Vec2::new(780.0, 300.0)));
    }

    #[test]
    fn test_wrap_first_edge_wins_at_corner() {
        // Crosses left and top at once: left is tested first
        let mut m = mover(22.0, 22.0, 135.0);
        let direction = Vec2::new(-1.0, -1.0).normalize();
        let tentative = m.position + direction * 10.0;
        BoundaryBehavior::WrapEdge.apply(&mut m, direction, 10.0, &CTX);
        // Crossed axis snaps to the right boundary, y keeps the tentative value
        assert!((m.position.x - 780.0).abs() < 1e-3);
        assert!((m.position.y - tentative.y).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_momentum_preserves_travel() {
        let mut m = mover(25.0, 300.0, 90.0);
        BoundaryBehavior::WrapMomentum.apply(&mut m, Vec2::NEG_X, 10.0, &CTX);
        assert!(approx(m.position, Vec2::new(775.0, 300.0)));
    }

    #[test]
    fn test_wrap_trajectory_uses_facing() {
        // Facing 135 degrees: up and to the left at 45 degrees
        let rotation = 135.0;
        let forward = forward_from_rotation(rotation);
        let mut m = mover(25.0, 300.0, rotation);
        BoundaryBehavior::WrapTrajectory.apply(&mut m, forward, 10.0, &CTX);
        let target = Vec2::new(25.0, 300.0) + forward * 10.0;
        let overshoot = 20.0 - target.x;
        assert!((m.position.x - 780.0).abs() < 1e-3);
        assert!((m.position.y - (target.y + overshoot)).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_relative_lands_on_opposite_edge() {
        let mut m = mover(400.0, 585.0, 0.0);
        BoundaryBehavior::WrapRelative.apply(&mut m, Vec2::Y, 10.0, &CTX);
        assert!(approx(m.position, Vec2::new(400.0, 20.0)));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "wrap-momentum".parse::<BoundaryBehavior>().unwrap(),
            BoundaryBehavior::WrapMomentum
        );
        assert_eq!("BOUNCE".parse::<BoundaryBehavior>().unwrap(), BoundaryBehavior::Bounce);
        assert!(matches!(
            "teleport".parse::<BoundaryBehavior>(),
            Err(SimError::UnknownBehavior { .. })
        ));
    }

    proptest! {
        #[test]
        fn proptest_containing_behaviors_stay_in_bounds(
            x in 20.0f32..780.0,
            y in 20.0f32..580.0,
            rotation in 0.0f32..360.0,
            distance in -500.0f32..500.0,
            which in 0usize..4,
        ) {
            let behavior = [
                BoundaryBehavior::Clamp,
                BoundaryBehavior::Stick,
                BoundaryBehavior::Check,
                BoundaryBehavior::Bounce,
            ][which];
            let mut m = mover(x, y, rotation);
            behavior.apply(&mut m, forward_from_rotation(rotation), distance, &CTX);
            // Bounce commits unclamped only when no edge is crossed
            let slack = 1e-3;
            prop_assert!(m.position.x >= 20.0 - slack && m.position.x <= 780.0 + slack);
            prop_assert!(m.position.y >= 20.0 - slack && m.position.y <= 580.0 + slack);
        }
    }
}
