//! Collision classification
//!
//! The engine reports pairs of bodies that started touching. Only three
//! combinations matter: two items bumping into each other, a present hitting
//! the floor, and a reindeer hitting the floor. Everything else is ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ItemId, ItemKind};

/// One side of a collision pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Body {
    /// World bounds (a body with no visual object attached)
    Boundary,
    /// Santa or any other non-item object
    Actor,
    /// A falling item and where the engine has it now
    Item { id: ItemId, pos: Vec2 },
}

impl Body {
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Body::Item { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Two bodies that started touching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionPair {
    pub a: Body,
    pub b: Body,
}

impl CollisionPair {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }
}

/// What the round should do about a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Push two items apart and lift them so they do not stack
    Repel { first: ItemId, second: ItemId },
    /// A present reached the ground: round over
    PresentLanded(ItemId),
    /// A reindeer reached the ground: points
    ReindeerLanded(ItemId),
    Ignore,
}

/// Whether an item at `pos` has reached the floor
#[inline]
pub fn on_ground(pos: Vec2, item_size: f32, floor_y: f32) -> bool {
    pos.y + item_size >= floor_y
}

/// Classify a collision pair. `kind_of` resolves live item IDs; items that
/// are already gone resolve to `None` and are ignored.
pub fn classify<F>(
    pair: &CollisionPair,
    kind_of: F,
    floor_y: f32,
    item_size: f32,
) -> CollisionOutcome
where
    F: Fn(ItemId) -> Option<ItemKind>,
{
    let known = |body: &Body| match *body {
        Body::Item { id, pos } => kind_of(id).map(|kind| (id, kind, pos)),
        _ => None,
    };

    match (known(&pair.a), known(&pair.b)) {
        (Some((first, ..)), Some((second, ..))) => CollisionOutcome::Repel { first, second },
        (Some(item), None) if pair.b == Body::Boundary => landing(item, item_size, floor_y),
        (None, Some(item)) if pair.a == Body::Boundary => landing(item, item_size, floor_y),
        _ => CollisionOutcome::Ignore,
    }
}

fn landing(
    (id, kind, pos): (ItemId, ItemKind, Vec2),
    item_size: f32,
    floor_y: f32,
) -> CollisionOutcome {
    if !on_ground(pos, item_size, floor_y) {
        // Side walls
        return CollisionOutcome::Ignore;
    }
    match kind {
        ItemKind::Present => CollisionOutcome::PresentLanded(id),
        ItemKind::Reindeer => CollisionOutcome::ReindeerLanded(id),
    }
}
