//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (entity list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    Body, Collider, Contact, box_box, box_circle, circle_circle, collision_pass, point_in_circle,
    resolve_collision, shapes_collide,
};
pub use shape::{Circle, Point, Rect, Shape, ShapeKind};
pub use spawn::{SpawnCell, SpawnGrid, allocate_spawns, allocate_spawns_seeded};
pub use state::{Entity, EntityKind, GameEvent, GameState};
pub use tick::{TickInput, tick};
