//! Small Game - collision and spawn core for a canvas arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shapes, collisions, spawn placement, tick)
//! - `settings`: Data-driven arena configuration
//! - `error`: Configuration errors surfaced by constructors and the allocator
//! - `web`: JavaScript bindings (wasm32 only)

pub mod error;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ConfigError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Square arena side length in pixels
    pub const ARENA_SIDE: f32 = 640.0;
    /// Spawn grid cells requested for the arena (3x3)
    pub const SPAWN_CELLS: usize = 9;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 256.0;

    /// Target defaults
    pub const TARGET_RADIUS: f32 = 16.0;

    /// Obstacle defaults (square box)
    pub const OBSTACLE_SIZE: f32 = 96.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 8.0;
    pub const BULLET_SPEED: f32 = 1024.0;
    /// Seconds a bullet lives before expiring
    pub const BULLET_LIFETIME: f32 = 2.0;
    /// Minimum seconds between shots
    pub const FIRE_COOLDOWN: f32 = 0.25;

    /// Collision tags
    pub const TAG_PLAYER: &str = "player";
    pub const TAG_TARGET: &str = "target";
    pub const TAG_OBSTACLE: &str = "obstacle";
    pub const TAG_BULLET: &str = "bullet";
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Clamp `v` into `[lo, hi]`. Requires `lo <= hi`.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    debug_assert!(lo <= hi, "clamp bounds inverted: {lo} > {hi}");
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
