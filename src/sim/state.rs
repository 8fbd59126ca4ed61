//! Game state and entity list
//!
//! The state owns the entity list the collision pass scans each tick. Spawn
//! placement is seeded so a run can be replayed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Body, Collider};
use super::shape::{Circle, Rect, Shape, ShapeKind};
use super::spawn::allocate_spawns;
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;

/// What an entity is, independent of its collision tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Target,
    Obstacle,
    Bullet,
}

/// A simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
    /// Velocity (pixels/s)
    pub vel: Vec2,
    /// Simulated seconds since spawn
    pub age: f32,
}

impl Entity {
    pub fn new(body: Body, kind: EntityKind) -> Self {
        Self {
            body,
            kind,
            vel: Vec2::ZERO,
            age: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.body.id
    }
}

impl AsRef<Body> for Entity {
    fn as_ref(&self) -> &Body {
        &self.body
    }
}

/// Things that happened during a tick, for the caller to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `source` reacted to touching `target`
    Collision {
        source: u32,
        target: u32,
        source_tag: String,
        target_tag: String,
    },
    BulletFired { id: u32 },
    BulletExpired { id: u32 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Completed spawn rounds; each round draws from its own stream
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next spawn round
    pub fn next_rng(&mut self) -> Pcg32 {
        let seed = self
            .seed
            .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.stream += 1;
        Pcg32::seed_from_u64(seed)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Simulated seconds since start
    pub time: f32,
    /// Entities in spawn order
    pub entities: Vec<Entity>,
    /// Last non-zero movement direction; bullets fly this way
    pub facing: Vec2,
    /// Seconds until the player may fire again
    pub fire_cooldown: f32,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a game with the given settings and seed, spawning the starting bodies
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut state = Self {
            settings,
            seed,
            rng_state: RngState::new(seed),
            time: 0.0,
            entities: Vec::new(),
            facing: Vec2::X,
            fire_cooldown: 0.0,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset()?;

        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace every entity with a freshly placed player, target and obstacle
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let s = &self.settings;
        let player = Shape::from(Circle::new(Vec2::ZERO, s.player_radius)?);
        let target = Shape::from(Circle::new(Vec2::ZERO, s.target_radius)?);
        let obstacle = Shape::from(Rect::new(Vec2::ZERO, s.obstacle_size, s.obstacle_size)?);

        let footprints = [player.footprint(), target.footprint(), obstacle.footprint()];
        let mut rng = self.rng_state.next_rng();
        let spawns = allocate_spawns(s.arena_side, &footprints, s.spawn_cells, &mut rng)?;

        let bodies = [
            (
                EntityKind::Player,
                player.placed_at(spawns[0]),
                Collider::new(ShapeKind::Circle, TAG_PLAYER, [TAG_TARGET, TAG_OBSTACLE]),
            ),
            (
                EntityKind::Target,
                target.placed_at(spawns[1]),
                Collider::new(ShapeKind::Circle, TAG_TARGET, Vec::<String>::new()),
            ),
            (
                EntityKind::Obstacle,
                obstacle.placed_at(spawns[2]),
                Collider::new(ShapeKind::Box, TAG_OBSTACLE, Vec::<String>::new()),
            ),
        ];

        self.entities.clear();
        for (kind, shape, collider) in bodies {
            let id = self.next_entity_id();
            self.entities.push(Entity::new(Body::new(id, shape, collider)?, kind));
        }
        self.facing = Vec2::X;
        self.fire_cooldown = 0.0;

        log::info!(
            "Reset round {}: player={:?} target={:?} obstacle={:?}",
            self.rng_state.stream,
            spawns[0],
            spawns[1],
            spawns[2]
        );
        Ok(())
    }

    /// Swap in new settings and start a fresh round with them
    ///
    /// Invalid settings are rejected and the current game is left untouched.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        settings.validate()?;
        let previous = std::mem::replace(&mut self.settings, settings);
        if let Err(e) = self.reset() {
            self.settings = previous;
            return Err(e);
        }
        log::info!("Applied new settings");
        Ok(())
    }

    /// Spawn a bullet at `center` moving with `vel`
    pub fn spawn_bullet(&mut self, center: Vec2, vel: Vec2) -> Result<u32, ConfigError> {
        let id = self.next_entity_id();
        let shape = Circle::new(center, self.settings.bullet_radius)?;
        let collider = Collider::new(ShapeKind::Circle, TAG_BULLET, [TAG_TARGET, TAG_OBSTACLE]);
        let mut bullet = Entity::new(Body::new(id, shape.into(), collider)?, EntityKind::Bullet);
        bullet.vel = vel;
        self.entities.push(bullet);
        Ok(id)
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// First entity of a kind (player, target and obstacle are unique)
    pub fn find(&self, kind: EntityKind) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == kind)
    }

    pub fn find_mut(&mut self, kind: EntityKind) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.kind == kind)
    }

    pub fn bullets(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.kind == EntityKind::Bullet)
    }

    /// Take the events recorded by the last tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::collision_pass;

    #[test]
    fn test_new_spawns_three_bodies() {
        let state = GameState::new(Settings::default(), 12345).unwrap();
        assert_eq!(state.entities.len(), 3);

        let player = state.find(EntityKind::Player).unwrap();
        assert_eq!(player.body.tag(), TAG_PLAYER);
        assert!(player.body.collider.reacts_to(TAG_TARGET));
        assert!(player.body.collider.reacts_to(TAG_OBSTACLE));

        let obstacle = state.find(EntityKind::Obstacle).unwrap();
        assert_eq!(obstacle.body.shape.kind(), ShapeKind::Box);
    }

    #[test]
    fn test_spawned_bodies_never_overlap() {
        for seed in 0..200 {
            let state = GameState::new(Settings::default(), seed).unwrap();
            assert!(
                collision_pass(&state.entities).is_empty(),
                "seed {seed} spawned overlapping bodies"
            );
            for e in &state.entities {
                let (min, max) = e.body.shape.bounds();
                assert!(min.x >= 0.0 && min.y >= 0.0);
                assert!(max.x <= ARENA_SIDE && max.y <= ARENA_SIDE);
            }
        }
    }

    #[test]
    fn test_reset_is_deterministic_per_seed() {
        let mut a = GameState::new(Settings::default(), 99).unwrap();
        let mut b = GameState::new(Settings::default(), 99).unwrap();
        a.reset().unwrap();
        b.reset().unwrap();

        let positions = |s: &GameState| -> Vec<Vec2> {
            s.entities.iter().map(|e| e.body.shape.position()).collect()
        };
        assert_eq!(positions(&a), positions(&b));

        // Consecutive rounds draw from different streams
        let before = positions(&a);
        a.reset().unwrap();
        assert_ne!(positions(&a), before);
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = Settings {
            arena_side: 300.0,
            spawn_cells: 4,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(settings, 1),
            Err(ConfigError::FootprintTooLarge { .. })
        ));
    }

    #[test]
    fn test_apply_settings_respawns_with_new_sizes() {
        let mut state = GameState::new(Settings::default(), 8).unwrap();
        let settings = Settings {
            arena_side: 900.0,
            obstacle_size: 120.0,
            ..Default::default()
        };
        state.apply_settings(settings.clone()).unwrap();

        assert_eq!(state.settings, settings);
        assert_eq!(state.entities.len(), 3);
        let obstacle = state.find(EntityKind::Obstacle).unwrap();
        assert_eq!(obstacle.body.shape.footprint(), 120.0);

        let before = state.entities.clone();
        let bad = Settings {
            player_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            state.apply_settings(bad),
            Err(ConfigError::Settings(_))
        ));
        assert_eq!(state.settings, settings);
        assert_eq!(state.entities.len(), before.len());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(Settings::default(), 5).unwrap();
        let id = state.spawn_bullet(Vec2::new(10.0, 10.0), Vec2::X).unwrap();
        let mut ids: Vec<u32> = state.entities.iter().map(Entity::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(state.entity(id).unwrap().kind, EntityKind::Bullet);
        assert_eq!(state.bullets().count(), 1);
    }
}
