//! Bounded entity pool
//!
//! Owns the transient game objects of a session (falling balls, pipes).
//! At most `capacity` entities are alive at once; total spawned over a
//! session is unbounded. Iteration is in spawn (id) order.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::session::Phase;
use super::timer::{TimerHandle, TimerScheduler};

/// Entity ids are never reused within a pool
pub type EntityId = u32;

/// Entity discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Pipe { upper: bool },
}

/// A transient physics-bearing object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Full width/height of the bounding box
    pub size: Vec2,
    pub alive: bool,
    /// Already counted for score (pipes)
    pub scored: bool,
}

impl Entity {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Blueprint for [`EntityPool::spawn`]
#[derive(Debug, Clone, Copy)]
pub struct Spawn {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

/// Bounded collection of alive entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool {
    capacity: usize,
    entities: Vec<Entity>,
    next_id: EntityId,
    spawned_total: u64,
}

impl EntityPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entities: Vec::with_capacity(capacity),
            next_id: 1,
            spawned_total: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn alive(&self) -> usize {
        self.entities.len()
    }

    /// Entities created over the pool's lifetime
    #[inline]
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    /// Whether `n` more entities fit
    pub fn has_room(&self, n: usize) -> bool {
        self.entities.len() + n <= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Create an entity. No-op (None) unless the session is active and the
    /// pool has room.
    pub fn spawn(&mut self, phase: Phase, spawn: Spawn) -> Option<EntityId> {
        if phase != Phase::Active || self.is_full() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.spawned_total += 1;
        self.entities.push(Entity {
            id,
            kind: spawn.kind,
            pos: spawn.pos,
            vel: spawn.vel,
            size: spawn.size,
            alive: true,
            scored: false,
        });
        Some(id)
    }

    /// Remove an entity. Retiring an id that is not in the pool is
    /// tolerated and returns false.
    pub fn retire(&mut self, id: EntityId) -> bool {
        match self.entities.iter().position(|e| e.id == id) {
            Some(idx) => {
                // remove, not swap_remove: keep id order
                self.entities.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Retire `id` and, if that leaves the pool below capacity in an active
    /// session, schedule `replenish` after `delay_ms`.
    pub fn retire_and_replenish<E>(
        &mut self,
        id: EntityId,
        phase: Phase,
        timers: &mut TimerScheduler<E>,
        delay_ms: u64,
        replenish: E,
    ) -> Option<TimerHandle> {
        if !self.retire(id) || phase != Phase::Active || self.is_full() {
            return None;
        }
        Some(timers.after(delay_ms, replenish))
    }

    /// Move every entity by its velocity over `dt` seconds
    pub fn integrate(&mut self, dt: f32) {
        for e in &mut self.entities {
            e.pos += e.vel * dt;
        }
    }

    /// Remove every entity for which `out_of_bounds` holds and return them,
    /// in id order, so the caller can apply penalties.
    pub fn sweep(&mut self, mut out_of_bounds: impl FnMut(&Entity) -> bool) -> Vec<Entity> {
        let mut swept = Vec::new();
        self.entities.retain(|e| {
            if out_of_bounds(e) {
                let mut gone = e.clone();
                gone.alive = false;
                swept.push(gone);
                false
            } else {
                true
            }
        });
        swept
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

/// Uniform x within `[margin, width - margin]` (falls back to the centre when
/// the margins overlap)
pub fn random_x<R: Rng>(rng: &mut R, width: f32, margin: f32) -> f32 {
    let lo = margin;
    let hi = width - margin;
    if hi <= lo {
        return width * 0.5;
    }
    rng.random_range(lo..=hi)
}
