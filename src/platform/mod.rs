//! Platform abstraction layer
//!
//! The round controller never draws, integrates physics or reads input
//! itself. It drives an [`Engine`] and the host forwards collisions, clicks
//! and timer ticks back to it.
//!
//! - `web`: browser host (wasm32 only), a JS engine object behind wasm-bindgen
//! - `headless`: in-memory engine for the native demo and tests

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessEngine;

use glam::Vec2;

use crate::sim::{FallingItem, ItemId};
use crate::ui::GameOverOverlay;

/// Capabilities the rules need from the host engine
pub trait Engine {
    /// Move Santa's sprite
    fn place_actor(&mut self, pos: Vec2, facing_right: bool);
    /// Create a physics body + sprite for a new item
    fn spawn_item(&mut self, item: &FallingItem);
    /// Remove an item's body and sprite
    fn destroy_item(&mut self, id: ItemId);
    fn set_item_velocity(&mut self, id: ItemId, vel: Vec2);
    /// Start calling `drop_tick` every `period_ms`
    fn start_drop_timer(&mut self, period_ms: u32);
    fn stop_drop_timer(&mut self);
    /// Remove every item (restart)
    fn clear_items(&mut self);
    fn show_game_over(&mut self, overlay: &GameOverOverlay);
    fn hide_game_over(&mut self);
}
