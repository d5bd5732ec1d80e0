//! Round controller
//!
//! Owns the round state and the RNG, applies the rules in `sim`, and tells the
//! engine what changed. The host calls in from its frame loop, its drop timer
//! and its collision/pointer callbacks, all on one thread.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::platform::Engine;
use crate::sim::{
    Body, CollisionOutcome, CollisionPair, DropDecision, GamePhase, ItemId, ItemKind, RoundState,
    award_points, classify, should_drop, spawn_item,
};
use crate::tuning::{Layout, Tuning};
use crate::ui::GameOverOverlay;

/// Something the HUD or sound layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    Dropped { id: ItemId, kind: ItemKind },
    Scored { points: u32, total: u64 },
    DifficultyUp { present_odds: u32 },
    GameOver { score: u64 },
    Restarted,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCause {
    ReindeerClicked(ItemId),
    PresentLanded(ItemId),
}

pub struct RoundController<E: Engine> {
    state: RoundState,
    tuning: Tuning,
    layout: Layout,
    rng: Pcg32,
    engine: E,
    events: Vec<RoundEvent>,
}

impl<E: Engine> RoundController<E> {
    /// Set up a round and start it
    pub fn new(engine: E, tuning: Tuning, layout: Layout, seed: u64) -> Self {
        let tuning = tuning.validated();
        let mut controller = Self {
            state: RoundState::new(&tuning),
            tuning,
            layout,
            rng: Pcg32::seed_from_u64(seed),
            engine,
            events: Vec::new(),
        };
        controller.begin();
        log::info!("Round started with seed: {}", seed);
        controller
    }

    fn begin(&mut self) {
        let santa = &self.state.santa;
        self.engine.place_actor(santa.pos, santa.facing_right);
        self.engine.start_drop_timer(self.tuning.drop_period_ms);
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Per-frame update: walk Santa
    pub fn update(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.frames += 1;
        let santa = &mut self.state.santa;
        santa.step(self.tuning.world.width);
        self.engine.place_actor(santa.pos, santa.facing_right);
    }

    /// Drop timer callback
    pub fn drop_tick(&mut self) -> DropDecision {
        if !self.state.is_running() {
            return DropDecision::NoDrop;
        }
        self.state.drop_ticks += 1;

        let decision = should_drop(&mut self.state.history, self.state.present_odds, &mut self.rng);
        if decision == DropDecision::Drop {
            let item = spawn_item(&mut self.state, &self.tuning, &mut self.rng);
            self.engine.spawn_item(&item);
            self.events.push(RoundEvent::Dropped {
                id: item.id,
                kind: item.kind,
            });
        }
        decision
    }

    /// Collision-start callback. Pairs after a round-ending one are dropped.
    pub fn collision_start(&mut self, pairs: &[CollisionPair]) {
        for pair in pairs {
            if !self.state.is_running() {
                return;
            }
            self.handle_pair(pair);
        }
    }

    fn handle_pair(&mut self, pair: &CollisionPair) {
        for body in [&pair.a, &pair.b] {
            if let Body::Item { id, pos } = *body {
                self.state.track_position(id, pos);
            }
        }

        let outcome = classify(
            pair,
            |id| self.state.item_kind(id),
            self.tuning.floor_y(),
            self.tuning.item_size,
        );

        match outcome {
            CollisionOutcome::Repel { first, second } => {
                let push = self.tuning.repel_speed_x;
                let lift = -self.tuning.repel_lift;
                self.engine.set_item_velocity(first, Vec2::new(-push, lift));
                self.engine.set_item_velocity(second, Vec2::new(push, lift));
            }
            CollisionOutcome::PresentLanded(id) => {
                self.remove(id);
                self.end_round(EndCause::PresentLanded(id));
            }
            CollisionOutcome::ReindeerLanded(id) => {
                self.remove(id);
                self.add_score(self.tuning.reindeer_points);
            }
            CollisionOutcome::Ignore => {}
        }
    }

    /// Pointer-down on an item
    pub fn pointer_down(&mut self, id: ItemId) {
        if !self.state.is_running() {
            return;
        }
        let Some(kind) = self.state.item_kind(id) else {
            log::debug!("Click on unknown item #{}", id);
            return;
        };
        self.remove(id);
        match kind {
            ItemKind::Present => self.add_score(self.tuning.present_points),
            ItemKind::Reindeer => self.end_round(EndCause::ReindeerClicked(id)),
        }
    }

    /// Reset everything and start a new round
    pub fn restart(&mut self) {
        self.engine.stop_drop_timer();
        self.engine.clear_items();
        self.engine.hide_game_over();
        self.state.reset(&self.tuning);
        self.events.push(RoundEvent::Restarted);
        self.begin();
        log::info!("Round restarted");
    }

    fn remove(&mut self, id: ItemId) {
        self.state.remove_item(id);
        self.engine.destroy_item(id);
    }

    fn add_score(&mut self, points: u32) {
        let change = award_points(&mut self.state, points, self.tuning.difficulty_step);
        self.events.push(RoundEvent::Scored {
            points,
            total: change.total,
        });
        if let Some(present_odds) = change.raised_to {
            log::info!("Difficulty up: present odds 1 in {}", present_odds);
            self.events.push(RoundEvent::DifficultyUp { present_odds });
        }
    }

    fn end_round(&mut self, cause: EndCause) {
        self.state.phase = GamePhase::GameOver;
        self.engine.stop_drop_timer();
        let overlay = GameOverOverlay::new(self.state.score, self.layout, &self.tuning.world);
        self.engine.show_game_over(&overlay);
        self.events.push(RoundEvent::GameOver {
            score: self.state.score,
        });
        log::info!("Game over ({:?}), score: {}", cause, self.state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessEngine;
    use crate::sim::FallingItem;

    fn controller() -> RoundController<HeadlessEngine> {
        let tuning = Tuning::default();
        let engine = HeadlessEngine::new(tuning.world.clone());
        RoundController::new(engine, tuning, Layout::Desktop, 12345)
    }

    /// Drop an item of a known kind straight into the round
    fn place(c: &mut RoundController<HeadlessEngine>, kind: ItemKind, y: f32) -> ItemId {
        let id = c.state.next_item_id();
        let item = FallingItem {
            id,
            kind,
            pos: Vec2::new(400.0, y),
            vel: Vec2::ZERO,
            flip_x: false,
            size: c.tuning.item_size,
        };
        c.engine.spawn_item(&item);
        c.state.insert_item(item);
        id
    }

    fn landing(id: ItemId) -> CollisionPair {
        CollisionPair::new(
            Body::Item {
                id,
                pos: Vec2::new(400.0, 550.0),
            },
            Body::Boundary,
        )
    }

    #[test]
    fn test_new_round_starts_timer() {
        let c = controller();
        assert!(c.engine().timer_running());
        assert_eq!(c.state().phase, GamePhase::Running);
        assert_eq!(c.engine().actor().0, Vec2::new(50.0, 60.0));
    }

    #[test]
    fn test_update_moves_santa() {
        let mut c = controller();
        c.update();
        c.update();
        assert_eq!(c.state().santa.pos.x, 60.0);
        assert_eq!(c.engine().actor().0.x, 60.0);
    }

    #[test]
    fn test_clicking_present_scores() {
        let mut c = controller();
        let id = place(&mut c, ItemKind::Present, 300.0);
        c.pointer_down(id);

        assert_eq!(c.score(), 10);
        assert!(c.state().item(id).is_none());
        assert_eq!(c.engine().destroyed, vec![id]);
        assert!(!c.is_game_over());
        assert_eq!(
            c.drain_events(),
            vec![RoundEvent::Scored { points: 10, total: 10 }]
        );
    }

    #[test]
    fn test_clicking_reindeer_ends_round() {
        let mut c = controller();
        let id = place(&mut c, ItemKind::Reindeer, 300.0);
        c.pointer_down(id);

        assert!(c.is_game_over());
        assert_eq!(c.score(), 0);
        assert!(!c.engine().timer_running());
        let overlay = c.engine().overlay().unwrap();
        assert_eq!(overlay.message, "GAMEOVER score: 0");
        assert!(c.drain_events().contains(&RoundEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_present_landing_ends_round() {
        let mut c = controller();
        let id = place(&mut c, ItemKind::Present, 540.0);
        c.collision_start(&[landing(id)]);

        assert!(c.is_game_over());
        assert_eq!(c.engine().destroyed, vec![id]);
    }

    #[test]
    fn test_reindeer_landing_scores() {
        let mut c = controller();
        let id = place(&mut c, ItemKind::Reindeer, 540.0);
        c.collision_start(&[landing(id)]);

        assert!(!c.is_game_over());
        assert_eq!(c.score(), 10);
        assert!(c.state().items.is_empty());
    }

    #[test]
    fn test_items_colliding_are_pushed_apart_and_lifted() {
        let mut c = controller();
        let a = place(&mut c, ItemKind::Present, 300.0);
        let b = place(&mut c, ItemKind::Reindeer, 310.0);
        let pair = CollisionPair::new(
            Body::Item {
                id: a,
                pos: Vec2::new(400.0, 300.0),
            },
            Body::Item {
                id: b,
                pos: Vec2::new(400.0, 310.0),
            },
        );
        c.collision_start(&[pair]);

        assert_eq!(c.engine().body(a).unwrap().vel, Vec2::new(-2.0, -5.0));
        assert_eq!(c.engine().body(b).unwrap().vel, Vec2::new(2.0, -5.0));
        assert_eq!(c.score(), 0);
    }

    #[test]
    fn test_nothing_happens_after_game_over() {
        let mut c = controller();
        let present = place(&mut c, ItemKind::Present, 540.0);
        let reindeer = place(&mut c, ItemKind::Reindeer, 540.0);
        let other = place(&mut c, ItemKind::Present, 300.0);

        // The present lands first; the reindeer landing in the same event is dropped
        c.collision_start(&[landing(present), landing(reindeer)]);
        assert!(c.is_game_over());
        assert_eq!(c.score(), 0);

        c.pointer_down(other);
        assert_eq!(c.score(), 0);

        let santa_x = c.state().santa.pos.x;
        c.update();
        assert_eq!(c.state().santa.pos.x, santa_x);

        let ticks = c.state().drop_ticks;
        assert_eq!(c.drop_tick(), DropDecision::NoDrop);
        assert_eq!(c.state().drop_ticks, ticks);
    }

    #[test]
    fn test_drop_ticks_spawn_items_in_engine() {
        let mut c = controller();
        let mut drops = 0;
        for _ in 0..200 {
            if c.drop_tick() == DropDecision::Drop {
                drops += 1;
            }
        }
        assert!(drops >= 200 / 11);
        assert_eq!(c.state().items.len(), drops);
        assert_eq!(c.engine().bodies().count(), drops);
        assert!(c.state().history.len() <= 10);
    }

    #[test]
    fn test_difficulty_rises_with_score() {
        let mut c = controller();
        for _ in 0..5 {
            let id = place(&mut c, ItemKind::Present, 300.0);
            c.pointer_down(id);
        }
        assert_eq!(c.score(), 50);
        assert_eq!(c.state().present_odds, 19);
        assert!(c.drain_events().contains(&RoundEvent::DifficultyUp { present_odds: 19 }));
    }

    #[test]
    fn test_restart_resets_round() {
        let mut c = controller();
        for _ in 0..6 {
            let id = place(&mut c, ItemKind::Present, 300.0);
            c.pointer_down(id);
        }
        for _ in 0..15 {
            c.drop_tick();
        }
        let id = place(&mut c, ItemKind::Reindeer, 300.0);
        c.pointer_down(id);
        assert!(c.is_game_over());

        c.restart();
        let tuning = Tuning::default();
        assert_eq!(c.state().phase, GamePhase::Running);
        assert_eq!(c.score(), 0);
        assert_eq!(c.state().present_odds, tuning.present_odds);
        assert_eq!(c.state().reindeer_odds, tuning.reindeer_odds);
        assert!(c.state().history.is_empty());
        assert!(c.state().items.is_empty());
        assert_eq!(c.engine().bodies().count(), 0);
        assert!(c.engine().overlay().is_none());
        assert!(c.engine().timer_running());
        assert_eq!(c.state().santa.pos, tuning.santa_start);
    }

    #[test]
    fn test_unattended_round_ends_when_a_present_lands() {
        let mut c = controller();
        for _ in 0..60 * 60 {
            if c.is_game_over() {
                break;
            }
            c.update();
            let fires = c.engine_mut().advance_timer(1000.0 / 60.0);
            for _ in 0..fires {
                c.drop_tick();
            }
            let pairs = c.engine_mut().step();
            c.collision_start(&pairs);
        }
        assert!(c.is_game_over());
        assert_eq!(c.score() % 10, 0);
        assert!(!c.engine().timer_running());
        assert!(c.engine().overlay().is_some());
    }

    #[test]
    fn test_state_snapshot_serializes() {
        let mut c = controller();
        place(&mut c, ItemKind::Present, 300.0);
        let json = serde_json::to_string(c.state()).unwrap();
        let back: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items, c.state().items);
    }
}
