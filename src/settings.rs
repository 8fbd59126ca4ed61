//! Arena and entity configuration
//!
//! Persisted as JSON in LocalStorage on the web; native builds use defaults
//! or a JSON file passed to the binary.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::spawn::SpawnGrid;

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Side of the square play area (pixels)
    pub arena_side: f32,
    /// Requested spawn grid cells (rounded down to a square)
    pub spawn_cells: usize,
    /// Fixed seed for spawn placement (None = pick one at startup)
    pub seed: Option<u64>,

    // === Entities ===
    pub player_radius: f32,
    /// Player speed (pixels/s)
    pub player_speed: f32,
    pub target_radius: f32,
    /// Obstacle box edge (pixels)
    pub obstacle_size: f32,

    // === Bullets ===
    pub bullet_radius: f32,
    /// Bullet speed (pixels/s)
    pub bullet_speed: f32,
    /// Seconds of simulated time before a bullet expires
    pub bullet_lifetime: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_side: ARENA_SIDE,
            spawn_cells: SPAWN_CELLS,
            seed: None,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            target_radius: TARGET_RADIUS,
            obstacle_size: OBSTACLE_SIZE,

            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME,
            fire_cooldown: FIRE_COOLDOWN,
        }
    }
}

fn check_extent(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::DegenerateShape { what, value })
    }
}

fn check_positive(what: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Settings(format!("{what} must be > 0, got {value}")))
    }
}

impl Settings {
    /// Footprints of the starting bodies: player, target, obstacle
    pub fn spawn_footprints(&self) -> [f32; 3] {
        [
            self.player_radius * 2.0,
            self.target_radius * 2.0,
            self.obstacle_size,
        ]
    }

    /// Check that the starting bodies fit the spawn grid
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_extent("player radius", self.player_radius)?;
        check_extent("target radius", self.target_radius)?;
        check_extent("obstacle size", self.obstacle_size)?;
        check_extent("bullet radius", self.bullet_radius)?;
        check_positive("player speed", self.player_speed)?;
        check_positive("bullet speed", self.bullet_speed)?;
        check_positive("bullet lifetime", self.bullet_lifetime)?;
        if !(self.fire_cooldown.is_finite() && self.fire_cooldown >= 0.0) {
            return Err(ConfigError::Settings(format!(
                "fire cooldown must be >= 0, got {}",
                self.fire_cooldown
            )));
        }

        let grid = SpawnGrid::new(self.arena_side, self.spawn_cells)?;
        grid.check_footprints(&self.spawn_footprints())
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| ConfigError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Settings(e.to_string()))
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "small_game_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
