//! Configuration errors
//!
//! Every failure in the core is a caller configuration mistake. Nothing here
//! is transient, so there is no retry path: callers fix their inputs.

use thiserror::Error;

use crate::sim::shape::ShapeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Shape name or code that is neither a box nor a circle
    #[error("invalid collision shape: {0}")]
    InvalidShape(String),

    /// Radius, width or height that is not strictly positive and finite
    #[error("degenerate {what}: {value} (must be > 0)")]
    DegenerateShape { what: &'static str, value: f32 },

    /// Collider declares one shape while the body carries another
    #[error("collider shape {collider:?} does not match body shape {body:?}")]
    ShapeMismatch { collider: ShapeKind, body: ShapeKind },

    /// Spawn area side that is not positive and finite
    #[error("invalid spawn area side: {0}")]
    InvalidArea(f32),

    /// Spawn grid requested with zero cells
    #[error("spawn grid needs at least one cell")]
    NoCells,

    /// More entities than usable grid cells
    #[error("{entities} entities do not fit in {cells} spawn cells")]
    TooManyEntities { entities: usize, cells: usize },

    /// Entity footprint larger than the padded cell interior
    #[error("entity {index} footprint {footprint} exceeds padded cell width {padded_width}")]
    FootprintTooLarge {
        index: usize,
        footprint: f32,
        padded_width: f32,
    },

    /// Settings payload that failed to parse
    #[error("invalid settings: {0}")]
    Settings(String),
}
