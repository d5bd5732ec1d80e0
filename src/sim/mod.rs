//! Deterministic gameplay rules
//!
//! All game rules live here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by item ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod scheduler;
pub mod spawner;
pub mod state;

pub use collision::{Body, CollisionOutcome, CollisionPair, classify, on_ground};
pub use difficulty::{ScoreChange, award_points};
pub use scheduler::should_drop;
pub use spawner::{choose_kind, spawn_item};
pub use state::{
    DropDecision, DropHistory, FallingItem, GamePhase, ItemId, ItemKind, RoundState, Santa,
};
