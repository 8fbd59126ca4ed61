//! JavaScript bindings
//!
//! The canvas game loop stays in JS; it calls into these for collision
//! checks, spawn placement and the simulation tick.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{self, Circle, GameState, Rect, TickInput};

fn to_js(e: ConfigError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Spawn centers as a flat `[x0, y0, x1, y1, ...]` array
#[wasm_bindgen]
pub fn allocate_spawns(
    area_side: f32,
    footprints: Vec<f32>,
    num_cells: usize,
    seed: u64,
) -> Result<Vec<f32>, JsValue> {
    let points = sim::allocate_spawns_seeded(area_side, &footprints, num_cells, seed).map_err(to_js)?;
    Ok(points.iter().flat_map(|p| [p.x, p.y]).collect())
}

#[wasm_bindgen]
pub fn circles_collide(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> Result<bool, JsValue> {
    let a = Circle::new(Vec2::new(ax, ay), ar).map_err(to_js)?;
    let b = Circle::new(Vec2::new(bx, by), br).map_err(to_js)?;
    Ok(sim::circle_circle(&a, &b))
}

#[wasm_bindgen]
pub fn box_circle_collide(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    cx: f32,
    cy: f32,
    r: f32,
) -> Result<bool, JsValue> {
    let rect = Rect::new(Vec2::new(x, y), w, h).map_err(to_js)?;
    let circle = Circle::new(Vec2::new(cx, cy), r).map_err(to_js)?;
    Ok(sim::box_circle(&rect, &circle))
}

/// Simulation handle owned by the JS game loop
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<WasmGame, JsValue> {
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(seed);
        let state = GameState::new(settings, seed).map_err(to_js)?;
        Ok(WasmGame { state })
    }

    /// Advance one frame; returns this tick's events as JSON
    pub fn tick(&mut self, dx: f32, dy: f32, fire: bool, dt: f32) -> Result<String, JsValue> {
        let input = TickInput {
            direction: Vec2::new(dx, dy),
            fire,
        };
        sim::tick(&mut self.state, &input, dt);
        serde_json::to_string(&self.state.events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.state.reset().map_err(to_js)
    }

    /// Active settings as JSON, for the options screen
    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.state.settings.to_json().map_err(to_js)
    }

    /// Validate, apply and persist settings; respawns the round on success
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(to_js)?;
        self.state.apply_settings(settings).map_err(to_js)?;
        self.state.settings.save();
        Ok(())
    }

    /// Current entities as JSON, for drawing
    pub fn entities_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.entities).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
