//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity id)
//! - No rendering or platform dependencies

pub mod contact;
pub mod gesture;
pub mod shape;
pub mod spawner;
pub mod state;
pub mod tick;

pub use contact::{ContactPair, find_contacts, resolve_contact, resolve_slice_hit};
pub use gesture::{GesturePath, PathPoint};
pub use shape::{Shape, closest_point_on_segment, segment_hits_shape, shapes_overlap};
pub use state::{
    ActionKind, Entity, EntityId, GameEvent, GamePhase, GameState, ParticleEffect, PhysicsBody,
    Role, ScheduledAction, Sound,
};
pub use tick::{EntityView, PointerEvent, Snapshot, TickInput, snapshot, tick};
