//! Simulation tick
//!
//! One tick moves everything, fires, expires bullets and runs the collision
//! pass. Removals are collected while scanning and applied afterwards, so the
//! entity list is never mutated mid-iteration.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::collision_pass;
use super::state::{EntityKind, GameEvent, GameState};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement; each axis is treated as -1, 0 or 1
    pub direction: Vec2,
    /// Fire button held
    pub fire: bool,
}

/// Snap each axis to -1, 0 or 1
fn axis_direction(dir: Vec2) -> Vec2 {
    let snap = |v: f32| {
        if v > 0.0 {
            1.0
        } else if v < 0.0 {
            -1.0
        } else {
            0.0
        }
    };
    Vec2::new(snap(dir.x), snap(dir.y))
}

/// Advance the simulation by `dt` seconds
///
/// Events for this tick replace `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time += dt;
    state.fire_cooldown = (state.fire_cooldown - dt).max(0.0);

    update_player(state, input);
    if input.fire && state.fire_cooldown <= 0.0 {
        fire_bullet(state);
    }

    for entity in &mut state.entities {
        entity.body.shape.translate(entity.vel * dt);
        entity.age += dt;
    }

    // Phase 1: expiry scan
    let expired = expired_bullets(state);
    for &id in &expired {
        state.events.push(GameEvent::BulletExpired { id });
    }
    state.entities.retain(|e| !expired.contains(&e.id()));

    // Phase 2: collision scan, then removals
    let mut removed = HashSet::new();
    for contact in collision_pass(&state.entities) {
        let (Some(source), Some(target)) = (state.entity(contact.source), state.entity(contact.target))
        else {
            continue;
        };

        match source.kind {
            // Bullets are spent on the first thing they hit
            EntityKind::Bullet => {
                removed.insert(source.id());
            }
            // Player contacts are for the caller to score
            EntityKind::Player => {}
            _ => log::warn!(
                "No collision logic for {} hitting {}",
                source.body.tag(),
                target.body.tag()
            ),
        }

        let event = GameEvent::Collision {
            source: contact.source,
            target: contact.target,
            source_tag: source.body.tag().to_string(),
            target_tag: target.body.tag().to_string(),
        };
        log::debug!("{:?}", event);
        state.events.push(event);
    }
    state.entities.retain(|e| !removed.contains(&e.id()));
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let dir = axis_direction(input.direction);
    if dir != Vec2::ZERO {
        state.facing = dir;
    }

    // Diagonals are normalized so they are not faster than straight moves
    let speed = state.settings.player_speed;
    if let Some(player) = state.find_mut(EntityKind::Player) {
        player.vel = dir.normalize_or_zero() * speed;
    }
}

fn fire_bullet(state: &mut GameState) {
    let Some(player) = state.find(EntityKind::Player) else {
        return;
    };
    let origin = player.body.shape.center();
    let vel = state.facing.normalize_or_zero() * state.settings.bullet_speed;

    match state.spawn_bullet(origin, vel) {
        Ok(id) => {
            state.fire_cooldown = state.settings.fire_cooldown;
            state.events.push(GameEvent::BulletFired { id });
        }
        Err(e) => log::warn!("Bullet spawn failed: {}", e),
    }
}

/// Bullets past their lifetime or fully outside the arena
fn expired_bullets(state: &GameState) -> HashSet<u32> {
    let side = state.settings.arena_side;
    let lifetime = state.settings.bullet_lifetime;

    state
        .bullets()
        .filter(|b| {
            let (min, max) = b.body.shape.bounds();
            let offscreen = max.x < 0.0 || max.y < 0.0 || min.x > side || min.y > side;
            offscreen || b.age >= lifetime
        })
        .map(|b| b.id())
        .collect()
}
