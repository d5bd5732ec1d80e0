//! Browser host
//!
//! The page owns the physics/render engine (sprites, bodies, timers, input)
//! and hands us an `EngineHost` object implementing the calls below. Events
//! flow back through the exported [`WebRound`] handle.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::Engine;
use crate::round::RoundController;
use crate::sim::{CollisionPair, FallingItem, ItemId};
use crate::tuning::{Layout, Tuning};
use crate::ui::GameOverOverlay;

#[wasm_bindgen]
extern "C" {
    /// Engine glue object supplied by the page
    pub type EngineHost;

    #[wasm_bindgen(method, js_name = placeActor)]
    fn place_actor(this: &EngineHost, x: f32, y: f32, facing_right: bool);

    #[wasm_bindgen(method, js_name = spawnItem)]
    fn spawn_item(
        this: &EngineHost,
        id: u32,
        texture: &str,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        flip_x: bool,
        size: f32,
    );

    #[wasm_bindgen(method, js_name = destroyItem)]
    fn destroy_item(this: &EngineHost, id: u32);

    #[wasm_bindgen(method, js_name = setItemVelocity)]
    fn set_item_velocity(this: &EngineHost, id: u32, vx: f32, vy: f32);

    #[wasm_bindgen(method, js_name = startDropTimer)]
    fn start_drop_timer(this: &EngineHost, period_ms: u32);

    #[wasm_bindgen(method, js_name = stopDropTimer)]
    fn stop_drop_timer(this: &EngineHost);

    #[wasm_bindgen(method, js_name = clearItems)]
    fn clear_items(this: &EngineHost);

    /// Receives a JSON-encoded `GameOverOverlay`
    #[wasm_bindgen(method, js_name = showGameOver)]
    fn show_game_over(this: &EngineHost, overlay_json: &str);

    #[wasm_bindgen(method, js_name = hideGameOver)]
    fn hide_game_over(this: &EngineHost);
}

/// [`Engine`] backed by the page's engine object
pub struct JsEngine {
    host: EngineHost,
}

impl Engine for JsEngine {
    fn place_actor(&mut self, pos: Vec2, facing_right: bool) {
        self.host.place_actor(pos.x, pos.y, facing_right);
    }

    fn spawn_item(&mut self, item: &FallingItem) {
        self.host.spawn_item(
            item.id,
            item.kind.texture_key(),
            item.pos.x,
            item.pos.y,
            item.vel.x,
            item.vel.y,
            item.flip_x,
            item.size,
        );
    }

    fn destroy_item(&mut self, id: ItemId) {
        self.host.destroy_item(id);
    }

    fn set_item_velocity(&mut self, id: ItemId, vel: Vec2) {
        self.host.set_item_velocity(id, vel.x, vel.y);
    }

    fn start_drop_timer(&mut self, period_ms: u32) {
        self.host.start_drop_timer(period_ms);
    }

    fn stop_drop_timer(&mut self) {
        self.host.stop_drop_timer();
    }

    fn clear_items(&mut self) {
        self.host.clear_items();
    }

    fn show_game_over(&mut self, overlay: &GameOverOverlay) {
        match serde_json::to_string(overlay) {
            Ok(json) => self.host.show_game_over(&json),
            Err(e) => log::warn!("Failed to encode game over overlay: {e}"),
        }
    }

    fn hide_game_over(&mut self) {
        self.host.hide_game_over();
    }
}

/// Layout for the current browser
fn detect_layout() -> Layout {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .map(|ua| Layout::from_user_agent(&ua))
        .unwrap_or_default()
}

/// Browser viewport in CSS pixels
fn viewport_size() -> (f32, f32) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as f32, h as f32)
}

fn default_tuning() -> Tuning {
    Tuning::for_layout(detect_layout(), viewport_size())
}

/// World settings (JSON) the page should build its physics world with
#[wasm_bindgen(js_name = worldConfig)]
pub fn world_config() -> String {
    serde_json::to_string(&default_tuning().world).unwrap_or_else(|e| {
        log::warn!("Failed to encode world config: {e}");
        String::from("{}")
    })
}

/// Round handle held by the page
#[wasm_bindgen]
pub struct WebRound {
    controller: RoundController<JsEngine>,
}

#[wasm_bindgen]
impl WebRound {
    /// Start a round. `tuning_json` may override any balance field.
    #[wasm_bindgen(constructor)]
    pub fn new(host: EngineHost, tuning_json: Option<String>) -> WebRound {
        let layout = detect_layout();
        let defaults = default_tuning();
        let tuning = match tuning_json {
            Some(json) => Tuning::load_or(&json, defaults),
            None => defaults,
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Santa Drop starting ({:?} layout)", layout);

        WebRound {
            controller: RoundController::new(JsEngine { host }, tuning, layout, seed),
        }
    }

    /// Per-frame update
    pub fn update(&mut self) {
        self.controller.update();
    }

    /// Drop timer callback. Returns true if an item was dropped.
    #[wasm_bindgen(js_name = dropTick)]
    pub fn drop_tick(&mut self) -> bool {
        self.controller.drop_tick() == crate::sim::DropDecision::Drop
    }

    /// Collision-start callback with a JSON array of pairs
    #[wasm_bindgen(js_name = collisionStart)]
    pub fn collision_start(&mut self, pairs_json: &str) {
        match serde_json::from_str::<Vec<CollisionPair>>(pairs_json) {
            Ok(pairs) => self.controller.collision_start(&pairs),
            Err(e) => log::warn!("Dropping malformed collision event: {e}"),
        }
    }

    /// Pointer-down on an item sprite
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, id: u32) {
        self.controller.pointer_down(id);
    }

    /// Retry button
    pub fn restart(&mut self) {
        self.controller.restart();
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> f64 {
        self.controller.score() as f64
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.controller.is_game_over()
    }

    /// Full round snapshot for the HUD
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        serde_json::to_string(self.controller.state()).unwrap_or_else(|e| {
            log::warn!("Failed to encode round state: {e}");
            String::from("{}")
        })
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        let events = self.controller.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode round events: {e}");
            String::from("[]")
        })
    }
}

/// Module entry point: logging and panic reporting
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}
