//! Entity arena
//!
//! Enemies and bullets live in one map keyed by a monotonically increasing
//! `EntityId`, so iteration order is spawn order and a removed entity can
//! never be reached again through a stale handle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::{Bullet, DrawContext, Enemy, Entity};
use super::geometry::Rect;
use crate::config::Config;
use crate::renderer::Surface;

/// Stable handle to an entity in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

/// Anything the arena can hold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Body {
    Enemy(Enemy),
    Bullet(Bullet),
}

impl Body {
    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Body::Enemy(e) => Some(e),
            Body::Bullet(_) => None,
        }
    }

    pub fn as_bullet(&self) -> Option<&Bullet> {
        match self {
            Body::Bullet(b) => Some(b),
            Body::Enemy(_) => None,
        }
    }
}

impl Entity for Body {
    fn update(&mut self, config: &Config) {
        match self {
            Body::Enemy(e) => e.update(config),
            Body::Bullet(b) => b.update(config),
        }
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        match self {
            Body::Enemy(e) => e.draw(surface, ctx),
            Body::Bullet(b) => b.draw(surface, ctx),
        }
    }

    fn bounds(&self) -> Rect {
        match self {
            Body::Enemy(e) => e.bounds(),
            Body::Bullet(b) => b.bounds(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct World {
    bodies: BTreeMap<EntityId, Body>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body and return its handle
    pub fn spawn(&mut self, body: Body) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, body);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Drop every body. Ids keep counting so old handles stay dead
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Live enemies, oldest first
    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Enemy)> {
        self.bodies
            .iter()
            .filter_map(|(id, body)| body.as_enemy().map(|e| (*id, e)))
    }

    /// Live bullets, oldest first
    pub fn bullets(&self) -> impl Iterator<Item = (EntityId, &Bullet)> {
        self.bodies
            .iter()
            .filter_map(|(id, body)| body.as_bullet().map(|b| (*id, b)))
    }

    /// Snapshot of enemy handles (safe to hold while removing)
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies().map(|(id, _)| id).collect()
    }

    pub fn bullet_ids(&self) -> Vec<EntityId> {
        self.bullets().map(|(id, _)| id).collect()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies().count()
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn enemy(x: f32) -> Body {
        Body::Enemy(Enemy {
            pos: Vec2::new(x, 0.0),
            size: 10.0,
            speed: 1.0,
        })
    }

    fn bullet(x: f32) -> Body {
        Body::Bullet(Bullet {
            pos: Vec2::new(x, 0.0),
            size: 2.0,
            speed: 1.0,
        })
    }

    #[test]
    fn test_iteration_is_spawn_order() {
        let mut world = World::new();
        let a = world.spawn(enemy(1.0));
        let b = world.spawn(bullet(2.0));
        let c = world.spawn(enemy(3.0));
        assert_eq!(world.enemy_ids(), vec![a, c]);
        assert_eq!(world.bullet_ids(), vec![b]);
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn test_removed_handles_stay_dead() {
        let mut world = World::new();
        let a = world.spawn(enemy(1.0));
        assert!(world.remove(a).is_some());
        assert!(world.remove(a).is_none());

        world.clear();
        let b = world.spawn(enemy(2.0));
        assert_ne!(a, b);
        assert!(!world.contains(a));
        assert!(world.get(b).is_some());
    }

    #[test]
    fn test_ids_keep_counting_past_u32() {
        let mut world = World::new();
        world.next_id = u64::from(u32::MAX);
        let a = world.spawn(enemy(1.0));
        let b = world.spawn(enemy(2.0));
        assert!(a < b);
        assert_eq!(world.enemy_ids(), vec![a, b]);
    }

    #[test]
    fn test_body_dispatch() {
        let config = Config::default();
        let mut body = bullet(5.0);
        body.update(&config);
        assert_eq!(body.bounds(), Rect::new(4.0, -3.0, 2.0, 4.0));
    }
}
