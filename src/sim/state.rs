//! Round state and core simulation types
//!
//! Everything a round needs to resume lives here and is serializable, so the
//! host can snapshot it for the HUD.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Santa walks, items fall
    Running,
    /// Round ended, waiting for restart
    GameOver,
}

/// Outcome of one drop timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropDecision {
    Drop,
    NoDrop,
}

/// Bounded log of recent drop decisions (oldest evicted first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropHistory {
    entries: VecDeque<DropDecision>,
    capacity: usize,
}

impl DropHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a decision, evicting the oldest if full
    pub fn push(&mut self, decision: DropDecision) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(decision);
    }

    pub fn last(&self) -> Option<DropDecision> {
        self.entries.back().copied()
    }

    /// True when the log is full and holds nothing but `NoDrop`
    pub fn is_dry_streak(&self) -> bool {
        self.entries.len() == self.capacity
            && self.entries.iter().all(|d| *d == DropDecision::NoDrop)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = DropDecision> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Santa, walking back and forth along the top of the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Santa {
    pub pos: Vec2,
    /// Horizontal speed magnitude
    pub speed: f32,
    /// Current horizontal velocity (signed)
    pub vel_x: f32,
    /// Sprite is mirrored to face right
    pub facing_right: bool,
    pub size: f32,
}

impl Santa {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.santa_start,
            speed: tuning.santa_speed,
            vel_x: tuning.santa_speed,
            facing_right: false,
            size: tuning.santa_size,
        }
    }

    /// Advance one frame, turning around at the screen edges
    pub fn step(&mut self, world_width: f32) {
        let half = self.size / 2.0;
        if self.pos.x >= world_width - half {
            self.vel_x = -self.speed;
            self.facing_right = false;
        } else if self.pos.x <= half {
            self.vel_x = self.speed;
            self.facing_right = true;
        }
        self.pos.x += self.vel_x;
    }

    /// Where dropped items appear
    pub fn drop_point(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size)
    }
}

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Click it before it lands
    Present,
    /// Let it land; clicking it ends the round
    Reindeer,
}

impl ItemKind {
    pub fn is_hazard(self) -> bool {
        self == ItemKind::Reindeer
    }

    /// Texture key used by the host
    pub fn texture_key(self) -> &'static str {
        match self {
            ItemKind::Present => "present",
            ItemKind::Reindeer => "reindeer",
        }
    }
}

/// Host-visible identifier of a falling item
pub type ItemId = u32;

/// A falling item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Last known position (spawn point until the engine reports otherwise)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sprite mirrored horizontally
    pub flip_x: bool,
    pub size: f32,
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: GamePhase,
    pub score: u64,
    /// "1 in N" odds of dropping on a tick
    pub present_odds: u32,
    /// "1 in N" odds that a drop is a reindeer
    pub reindeer_odds: u32,
    pub history: DropHistory,
    pub santa: Santa,
    /// Live items (sorted by id)
    pub items: Vec<FallingItem>,
    /// Frames simulated this round
    pub frames: u64,
    /// Drop timer ticks seen this round
    pub drop_ticks: u64,
    /// Next item ID (never reset so stale host events cannot alias new items)
    next_id: ItemId,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Running,
            score: 0,
            present_odds: tuning.present_odds.max(1),
            reindeer_odds: tuning.reindeer_odds.max(1),
            history: DropHistory::new(tuning.history_capacity),
            santa: Santa::new(tuning),
            items: Vec::new(),
            frames: 0,
            drop_ticks: 0,
            next_id: 1,
        }
    }

    /// Put everything back to its initial value, keeping the ID counter
    pub fn reset(&mut self, tuning: &Tuning) {
        let next_id = self.next_id;
        *self = Self::new(tuning);
        self.next_id = next_id;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> ItemId {
        let id = self.next_id;
        self.next_id = match self.next_id.checked_add(1) {
            Some(next) => next,
            None => {
                log::warn!("Item ids exhausted, wrapping around");
                1
            }
        };
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&FallingItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_kind(&self, id: ItemId) -> Option<ItemKind> {
        self.item(id).map(|i| i.kind)
    }

    /// Remember the engine-reported position of an item
    pub fn track_position(&mut self, id: ItemId, pos: Vec2) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.pos = pos;
        }
    }

    pub fn insert_item(&mut self, item: FallingItem) {
        self.items.push(item);
        self.items.sort_by_key(|i| i.id);
    }

    /// Remove an item, returning it if it was still alive
    pub fn remove_item(&mut self, id: ItemId) -> Option<FallingItem> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut h = DropHistory::new(3);
        h.push(DropDecision::Drop);
        h.push(DropDecision::NoDrop);
        h.push(DropDecision::NoDrop);
        assert!(!h.is_dry_streak());

        h.push(DropDecision::NoDrop);
        assert_eq!(h.len(), 3);
        assert!(h.is_dry_streak());
        assert_eq!(h.last(), Some(DropDecision::NoDrop));
    }

    #[test]
    fn test_history_not_dry_until_full() {
        let mut h = DropHistory::new(10);
        for _ in 0..9 {
            h.push(DropDecision::NoDrop);
        }
        assert!(!h.is_dry_streak());
        h.push(DropDecision::NoDrop);
        assert!(h.is_dry_streak());
    }

    #[test]
    fn test_santa_bounces_between_edges() {
        let tuning = Tuning::default();
        let mut santa = Santa::new(&tuning);
        let width = tuning.world.width;

        let mut max_x = f32::MIN;
        let mut turned_left = false;
        for _ in 0..400 {
            santa.step(width);
            max_x = max_x.max(santa.pos.x);
            if santa.vel_x < 0.0 {
                turned_left = true;
                assert!(!santa.facing_right);
            }
        }
        assert!(turned_left);
        assert!(max_x <= width - santa.size / 2.0 + santa.speed);
    }

    #[test]
    fn test_santa_turns_right_at_left_edge() {
        let tuning = Tuning::default();
        let mut santa = Santa::new(&tuning);
        santa.pos.x = 40.0;
        santa.vel_x = -santa.speed;
        santa.step(tuning.world.width);
        assert_eq!(santa.vel_x, santa.speed);
        assert!(santa.facing_right);
        assert_eq!(santa.pos.x, 45.0);
    }

    #[test]
    fn test_reset_keeps_id_counter() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning);
        let first = state.next_item_id();
        state.score = 120;
        state.present_odds = 3;
        state.history.push(DropDecision::Drop);
        state.reset(&tuning);

        assert_eq!(state.score, 0);
        assert_eq!(state.present_odds, tuning.present_odds);
        assert!(state.history.is_empty());
        assert!(state.next_item_id() > first);
    }

    #[test]
    fn test_item_ids_wrap_instead_of_overflowing() {
        let mut state = RoundState::new(&Tuning::default());
        state.next_id = u32::MAX;
        assert_eq!(state.next_item_id(), u32::MAX);
        assert_eq!(state.next_item_id(), 1);
        assert_eq!(state.next_item_id(), 2);
    }
}
