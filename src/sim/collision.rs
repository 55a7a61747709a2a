//! Collision response between circular bodies
//!
//! `bounce` is a 1-D elastic exchange along the contact normal with radius
//! as mass, followed by an even positional split of any overlap. The
//! dispatcher maps the configured [`CollisionOutcome`] onto asteroid pairs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, SplitContext};
use super::body::Body;
use crate::consts::COINCIDENT_EPSILON_SQ;
use crate::error::SimError;

/// What `bounce` did to the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceResult {
    /// Velocities exchanged along the normal, overlap separated
    Resolved,
    /// Bodies already moving apart; nothing changed
    Separating,
    /// Centers (almost) coincide, no usable normal
    Coincident,
    /// Radii sum to zero, no usable masses
    ZeroMass,
}

/// Elastic bounce of two circular bodies.
///
/// Momentum (mass = radius) is conserved by the velocity update. Bodies that
/// are not approaching are left untouched, including any overlap.
pub fn bounce(a: &mut Body, b: &mut Body) -> BounceResult {
    let delta = b.position - a.position;
    let distance_sq = delta.length_squared();
    if distance_sq < COINCIDENT_EPSILON_SQ {
        log::debug!(
            "Bodies at almost identical position {:?}, skipping bounce",
            a.position
        );
        return BounceResult::Coincident;
    }

    let distance = distance_sq.sqrt();
    let normal = delta / distance;

    // Rate at which the gap along the normal grows; negative means closing
    let separating_speed = (b.velocity - a.velocity).dot(normal);
    if separating_speed >= 0.0 {
        return BounceResult::Separating;
    }

    let (m1, m2) = (a.mass(), b.mass());
    let total = m1 + m2;
    if total <= 0.0 {
        log::debug!("Total mass is zero, skipping bounce");
        return BounceResult::ZeroMass;
    }

    let v1n = a.velocity.dot(normal);
    let v2n = b.velocity.dot(normal);
    let new_v1n = ((m1 - m2) * v1n + 2.0 * m2 * v2n) / total;
    let new_v2n = ((m2 - m1) * v2n + 2.0 * m1 * v1n) / total;

    // Tangential components are unchanged
    a.velocity += (new_v1n - v1n) * normal;
    b.velocity += (new_v2n - v2n) * normal;

    let overlap = a.radius + b.radius - distance;
    if overlap > 0.0 {
        let push = normal * (overlap / 2.0);
        a.position -= push;
        b.position += push;
    }

    BounceResult::Resolved
}

/// Configured response to two asteroids touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionOutcome {
    #[default]
    Nothing,
    Delete,
    Split,
    Bounce,
}

impl CollisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionOutcome::Nothing => "nothing",
            CollisionOutcome::Delete => "delete",
            CollisionOutcome::Split => "split",
            CollisionOutcome::Bounce => "bounce",
        }
    }

    /// Act on one colliding pair, recording what happened in `effects`.
    /// Bodies killed earlier in the same pass are never acted on again.
    pub fn dispatch(
        &self,
        a: &mut Asteroid,
        b: &mut Asteroid,
        ctx: &mut SplitContext<'_>,
        effects: &mut Vec<CollisionEffect>,
    ) {
        match self {
            CollisionOutcome::Nothing => {}
            CollisionOutcome::Delete => {
                for asteroid in [a, b] {
                    if asteroid.is_alive() {
                        asteroid.kill();
                        effects.push(CollisionEffect::Destroyed { id: asteroid.id });
                    }
                }
            }
            CollisionOutcome::Split => {
                for asteroid in [a, b] {
                    if asteroid.is_alive() {
                        let fragments = asteroid.split(ctx);
                        effects.push(CollisionEffect::Split {
                            id: asteroid.id,
                            fragments,
                        });
                    }
                }
            }
            CollisionOutcome::Bounce => {
                if a.is_alive() && b.is_alive() {
                    let result = a.bounce(b);
                    if result != BounceResult::Resolved {
                        log::debug!("asteroids {} and {} not bounced: {:?}", a.id, b.id, result);
                    }
                    effects.push(CollisionEffect::Bounced {
                        a: a.id,
                        b: b.id,
                        result,
                    });
                }
            }
        }
    }
}

impl FromStr for CollisionOutcome {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nothing" => Ok(CollisionOutcome::Nothing),
            "delete" => Ok(CollisionOutcome::Delete),
            "split" => Ok(CollisionOutcome::Split),
            "bounce" => Ok(CollisionOutcome::Bounce),
            _ => Err(SimError::UnknownBehavior {
                kind: "collision outcome",
                value: s.to_string(),
            }),
        }
    }
}

/// What a dispatched pair did to its asteroids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEffect {
    /// Removed without fragments
    Destroyed { id: u32 },
    /// Destroyed, leaving `fragments` children
    Split { id: u32, fragments: usize },
    Bounced { a: u32, b: u32, result: BounceResult },
}

/// Result of one pairwise pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Pairs handed to the dispatcher
    pub pairs: usize,
    pub effects: Vec<CollisionEffect>,
}

/// Mutable references to two distinct elements, `i < j`
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Pairwise asteroid-asteroid pass over live, vulnerable asteroids.
///
/// Colliding pairs are collected from a snapshot first, then dispatched with
/// liveness re-checked per pair. Killed asteroids stay in the slice (dead)
/// and fragments go to `ctx.fragments`; removal happens after the pass.
pub fn resolve_asteroid_collisions(
    asteroids: &mut [Asteroid],
    outcome: CollisionOutcome,
    ctx: &mut SplitContext<'_>,
) -> CollisionReport {
    let eligible = |a: &Asteroid| a.is_alive() && a.is_vulnerable();

    let mut pairs = Vec::new();
    for i in 0..asteroids.len() {
        if !eligible(&asteroids[i]) {
            continue;
        }
        for j in (i + 1)..asteroids.len() {
            if eligible(&asteroids[j]) && asteroids[i].check_collision(&asteroids[j].body) {
                pairs.push((i, j));
            }
        }
    }

    let mut report = CollisionReport::default();
    for (i, j) in pairs {
        let (a, b) = pair_mut(asteroids, i, j);
        if !(a.is_alive() && b.is_alive()) {
            continue;
        }
        outcome.dispatch(a, b, ctx, &mut report.effects);
        report.pairs += 1;
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AsteroidSettings, SplitSettings};
    use crate::sim::state::EntityIds;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn body(x: f32, y: f32, vx: f32, vy: f32, r: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(vx, vy), r)
    }

    fn total_momentum(a: &Body, b: &Body) -> Vec2 {
        a.momentum() + b.momentum()
    }

    #[test]
    fn test_head_on_equal_mass_swaps_velocities() {
        let mut a = body(0.0, 0.0, 10.0, 0.0, 5.0);
        let mut b = body(15.0, 0.0, -10.0, 0.0, 5.0);

        assert_eq!(bounce(&mut a, &mut b), BounceResult::Resolved);
        assert!((a.velocity - Vec2::new(-10.0, 0.0)).length() < 1e-4);
        assert!((b.velocity - Vec2::new(10.0, 0.0)).length() < 1e-4);
        // Not overlapping (15 > 10), so positions are untouched
        assert_eq!(a.position, Vec2::ZERO);
        assert_eq!(b.position, Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_overlap_is_split_evenly() {
        let mut a = body(0.0, 0.0, 10.0, 0.0, 10.0);
        let mut b = body(16.0, 0.0, -10.0, 0.0, 10.0);

        bounce(&mut a, &mut b);
        assert!((a.position.x - (-2.0)).abs() < 1e-4);
        assert!((b.position.x - 18.0).abs() < 1e-4);
        assert!((a.position.distance(b.position) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_separating_bodies_untouched() {
        let mut a = body(0.0, 0.0, -5.0, 1.0, 10.0);
        let mut b = body(12.0, 0.0, 5.0, 0.0, 10.0);
        let (a0, b0) = (a, b);

        assert_eq!(bounce(&mut a, &mut b), BounceResult::Separating);
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_coincident_bodies_are_skipped() {
        let mut a = body(5.0, 5.0, 1.0, 0.0, 10.0);
        let mut b = body(5.0, 5.0, -1.0, 0.0, 10.0);
        let (a0, b0) = (a, b);

        assert_eq!(bounce(&mut a, &mut b), BounceResult::Coincident);
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_zero_mass_is_skipped() {
        let mut a = body(0.0, 0.0, 1.0, 0.0, 0.0);
        let mut b = body(1.0, 0.0, -1.0, 0.0, 0.0);
        assert_eq!(bounce(&mut a, &mut b), BounceResult::ZeroMass);
        assert_eq!(a.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_heavy_body_barely_moves() {
        let mut light = body(0.0, 0.0, 10.0, 0.0, 1.0);
        let mut heavy = body(50.0, 0.0, 0.0, 0.0, 100.0);
        bounce(&mut light, &mut heavy);
        assert!(light.velocity.x < 0.0);
        assert!(heavy.velocity.x > 0.0 && heavy.velocity.x < 1.0);
    }

    #[test]
    fn test_tangential_component_preserved() {
        let mut a = body(0.0, 0.0, 10.0, 7.0, 5.0);
        let mut b = body(9.0, 0.0, -10.0, -3.0, 5.0);
        bounce(&mut a, &mut b);
        assert!((a.velocity.y - 7.0).abs() < 1e-4);
        assert!((b.velocity.y - (-3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_outcome_from_str() {
        assert_eq!("Split".parse::<CollisionOutcome>().unwrap(), CollisionOutcome::Split);
        assert!("explode".parse::<CollisionOutcome>().is_err());
    }

    struct World {
        ids: EntityIds,
        rng: Pcg32,
        asteroid: AsteroidSettings,
        split: SplitSettings,
        fragments: Vec<Asteroid>,
    }

    impl World {
        fn new() -> Self {
            Self {
                ids: EntityIds::default(),
                rng: Pcg32::seed_from_u64(1),
                asteroid: AsteroidSettings::default(),
                split: SplitSettings::default(),
                fragments: Vec::new(),
            }
        }

        fn resolve(&mut self, asteroids: &mut [Asteroid], outcome: CollisionOutcome) -> CollisionReport {
            let mut ctx = SplitContext {
                ids: &mut self.ids,
                rng: &mut self.rng,
                asteroid: &self.asteroid,
                split: &self.split,
                fragments: &mut self.fragments,
            };
            resolve_asteroid_collisions(asteroids, outcome, &mut ctx)
        }
    }

    fn rock(id: u32, x: f32, vx: f32, r: f32) -> Asteroid {
        Asteroid::new(id, body(x, 100.0, vx, 0.0, r), 0.0)
    }

    #[test]
    fn test_delete_kills_both() {
        let mut world = World::new();
        let mut rocks = vec![rock(1, 0.0, 1.0, 40.0), rock(2, 50.0, -1.0, 40.0)];
        let report = world.resolve(&mut rocks, CollisionOutcome::Delete);
        assert_eq!(report.pairs, 1);
        assert_eq!(
            report.effects,
            vec![
                CollisionEffect::Destroyed { id: 1 },
                CollisionEffect::Destroyed { id: 2 },
            ]
        );
        assert!(rocks.iter().all(|r| !r.is_alive()));
    }

    #[test]
    fn test_nothing_leaves_pair_alone() {
        let mut world = World::new();
        let mut rocks = vec![rock(1, 0.0, 1.0, 40.0), rock(2, 50.0, -1.0, 40.0)];
        let report = world.resolve(&mut rocks, CollisionOutcome::Nothing);
        assert_eq!(report.pairs, 1);
        assert!(report.effects.is_empty());
        assert!(rocks.iter().all(|r| r.is_alive()));
        assert_eq!(rocks[0].body.velocity.x, 1.0);
    }

    #[test]
    fn test_split_processes_each_body_once() {
        let mut world = World::new();
        // Three mutually overlapping rocks: the (1, 3) and (2, 3) pairs
        // involve already-split bodies and must be skipped
        let mut rocks = vec![
            rock(1, 0.0, 1.0, 40.0),
            rock(2, 30.0, -1.0, 40.0),
            rock(3, 60.0, -1.0, 40.0),
        ];
        let report = world.resolve(&mut rocks, CollisionOutcome::Split);
        assert_eq!(report.pairs, 1);
        assert_eq!(
            report.effects,
            vec![
                CollisionEffect::Split { id: 1, fragments: 2 },
                CollisionEffect::Split { id: 2, fragments: 2 },
            ]
        );
        assert!(!rocks[0].is_alive());
        assert!(!rocks[1].is_alive());
        assert!(rocks[2].is_alive());
        // Each 40 px rock yields two 20 px fragments
        assert_eq!(world.fragments.len(), 4);
        assert!(world.fragments.iter().all(|f| f.body.radius == 20.0));
    }

    #[test]
    fn test_bounce_outcome_changes_velocities() {
        let mut world = World::new();
        let mut rocks = vec![rock(1, 0.0, 10.0, 20.0), rock(2, 35.0, -10.0, 20.0)];
        let report = world.resolve(&mut rocks, CollisionOutcome::Bounce);
        assert_eq!(
            report.effects,
            vec![CollisionEffect::Bounced {
                a: 1,
                b: 2,
                result: BounceResult::Resolved,
            }]
        );
        assert!(rocks.iter().all(|r| r.is_alive()));
        assert!(rocks[0].body.velocity.x < 0.0);
        assert!(rocks[1].body.velocity.x > 0.0);
    }

    #[test]
    fn test_invulnerable_asteroids_are_ignored() {
        let mut world = World::new();
        let mut rocks = vec![rock(1, 0.0, 1.0, 40.0), rock(2, 50.0, -1.0, 40.0)];
        rocks[1].invulnerable_timer = 0.5;
        let report = world.resolve(&mut rocks, CollisionOutcome::Delete);
        assert_eq!(report.pairs, 0);
        assert!(report.effects.is_empty());
        assert!(rocks.iter().all(|r| r.is_alive()));
    }

    proptest! {
        #[test]
        fn proptest_momentum_conserved(
            x in -50.0f32..50.0, y in -50.0f32..50.0,
            v1x in -100.0f32..100.0, v1y in -100.0f32..100.0,
            v2x in -100.0f32..100.0, v2y in -100.0f32..100.0,
            r1 in 1.0f32..100.0, r2 in 1.0f32..100.0,
        ) {
            prop_assume!(x * x + y * y > 1.0);
            let mut a = body(0.0, 0.0, v1x, v1y, r1);
            let mut b = body(x, y, v2x, v2y, r2);
            let before = total_momentum(&a, &b);
            let energy_before = r1 * a.velocity.length_squared() + r2 * b.velocity.length_squared();

            bounce(&mut a, &mut b);

            let after = total_momentum(&a, &b);
            let energy_after = r1 * a.velocity.length_squared() + r2 * b.velocity.length_squared();
            let scale = 1.0 + before.length() + (r1 + r2) * 200.0;
            prop_assert!((after - before).length() <= 1e-4 * scale);
            // Elastic: no energy injected
            prop_assert!(energy_after <= energy_before * (1.0 + 1e-4) + 1e-2);
        }
    }
}
