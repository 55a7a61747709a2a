//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - dt supplied by the caller, no internal clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod asteroid;
pub mod body;
pub mod boundary;
pub mod collision;
pub mod edge;
pub mod growth;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, SplitContext};
pub use body::{Arena, Body};
pub use boundary::{BoundaryBehavior, BoundaryContext, Mover};
pub use collision::{
    BounceResult, CollisionEffect, CollisionOutcome, CollisionReport, bounce,
    resolve_asteroid_collisions,
};
pub use edge::{Edge, TransferKind};
pub use growth::{GrowthKind, GrowthSetting};
pub use player::{Player, Shot, TurnBehavior};
pub use spawn::{SpawnContext, SpawnReport, SpawnScheduler};
pub use state::{Drawable, DrawableKind, EntityIds, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
