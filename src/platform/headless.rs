//! In-memory engine
//!
//! Enough of an engine to play a round without a browser: items fall under a
//! constant per-step gravity, stop on the floor, and report "collision start"
//! pairs the way a physics engine would. Used by the native demo and tests.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::Engine;
use crate::sim::{Body, CollisionPair, FallingItem, ItemId, ItemKind};
use crate::tuning::WorldConfig;
use crate::ui::GameOverOverlay;

/// A simulated item body
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBody {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    grounded: bool,
}

impl HeadlessBody {
    fn contains(&self, point: Vec2) -> bool {
        let half = self.size / 2.0;
        (point - self.pos).abs().cmple(Vec2::splat(half)).all()
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    world: WorldConfig,
    bodies: BTreeMap<ItemId, HeadlessBody>,
    /// Item pairs currently overlapping (lower id first)
    touching: BTreeSet<(ItemId, ItemId)>,
    actor_pos: Vec2,
    actor_facing_right: bool,
    timer_period_ms: Option<u32>,
    timer_elapsed_ms: f32,
    overlay: Option<GameOverOverlay>,
    /// Every item ever destroyed, in order
    pub destroyed: Vec<ItemId>,
}

impl HeadlessEngine {
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            bodies: BTreeMap::new(),
            touching: BTreeSet::new(),
            actor_pos: Vec2::ZERO,
            actor_facing_right: false,
            timer_period_ms: None,
            timer_elapsed_ms: 0.0,
            overlay: None,
            destroyed: Vec::new(),
        }
    }

    pub fn body(&self, id: ItemId) -> Option<&HeadlessBody> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (ItemId, &HeadlessBody)> {
        self.bodies.iter().map(|(id, b)| (*id, b))
    }

    pub fn actor(&self) -> (Vec2, bool) {
        (self.actor_pos, self.actor_facing_right)
    }

    pub fn overlay(&self) -> Option<&GameOverOverlay> {
        self.overlay.as_ref()
    }

    pub fn timer_running(&self) -> bool {
        self.timer_period_ms.is_some()
    }

    /// Topmost (newest) item under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<ItemId> {
        self.bodies
            .iter()
            .rev()
            .find(|(_, b)| b.contains(point))
            .map(|(id, _)| *id)
    }

    /// Advance the drop timer, returning how many ticks fired
    pub fn advance_timer(&mut self, dt_ms: f32) -> u32 {
        let Some(period) = self.timer_period_ms else {
            return 0;
        };
        let period = period.max(1) as f32;
        self.timer_elapsed_ms += dt_ms;
        let fires = (self.timer_elapsed_ms / period).floor();
        self.timer_elapsed_ms -= fires * period;
        fires as u32
    }

    /// Integrate one physics step and return the pairs that started touching
    pub fn step(&mut self) -> Vec<CollisionPair> {
        let mut started = Vec::new();
        let gravity = self.world.gravity_y;
        let (width, floor) = (self.world.width, self.world.height);

        for (id, body) in self.bodies.iter_mut() {
            if body.grounded {
                continue;
            }
            body.vel.y += gravity;
            body.pos += body.vel;

            let half = body.size / 2.0;
            body.pos.x = body.pos.x.clamp(half, (width - half).max(half));
            if body.pos.y + half >= floor {
                body.pos.y = floor - half;
                body.vel = Vec2::ZERO;
                body.grounded = true;
                started.push(CollisionPair::new(
                    Body::Item { id: *id, pos: body.pos },
                    Body::Boundary,
                ));
            }
        }

        let ids: Vec<ItemId> = self.bodies.keys().copied().collect();
        let mut overlapping = BTreeSet::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                let (ba, bb) = (&self.bodies[a], &self.bodies[b]);
                let reach = (ba.size + bb.size) * 0.4;
                if ba.pos.distance(bb.pos) < reach {
                    overlapping.insert((*a, *b));
                    if !self.touching.contains(&(*a, *b)) {
                        started.push(CollisionPair::new(
                            Body::Item { id: *a, pos: ba.pos },
                            Body::Item { id: *b, pos: bb.pos },
                        ));
                    }
                }
            }
        }
        self.touching = overlapping;

        started
    }
}

impl Engine for HeadlessEngine {
    fn place_actor(&mut self, pos: Vec2, facing_right: bool) {
        self.actor_pos = pos;
        self.actor_facing_right = facing_right;
    }

    fn spawn_item(&mut self, item: &FallingItem) {
        self.bodies.insert(
            item.id,
            HeadlessBody {
                kind: item.kind,
                pos: item.pos,
                vel: item.vel,
                size: item.size,
                grounded: false,
            },
        );
    }

    fn destroy_item(&mut self, id: ItemId) {
        if self.bodies.remove(&id).is_some() {
            self.touching.retain(|(a, b)| *a != id && *b != id);
            self.destroyed.push(id);
        }
    }

    fn set_item_velocity(&mut self, id: ItemId, vel: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.vel = vel;
            body.grounded = false;
        }
    }

    fn start_drop_timer(&mut self, period_ms: u32) {
        self.timer_period_ms = Some(period_ms);
        self.timer_elapsed_ms = 0.0;
    }

    fn stop_drop_timer(&mut self) {
        self.timer_period_ms = None;
    }

    fn clear_items(&mut self) {
        self.bodies.clear();
        self.touching.clear();
    }

    fn show_game_over(&mut self, overlay: &GameOverOverlay) {
        self.overlay = Some(overlay.clone());
    }

    fn hide_game_over(&mut self) {
        self.overlay = None;
    }
}
