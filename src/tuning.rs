//! Data-driven game balance
//!
//! Every knob the rules read lives in [`Tuning`]. Hosts may pass a partial
//! JSON document; missing fields keep the layout defaults (see [`Tuning::load_or`]).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Screen class the game is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Layout {
    #[default]
    Desktop,
    Mobile,
}

impl Layout {
    /// Guess the layout from a browser user agent string
    pub fn from_user_agent(ua: &str) -> Self {
        const MOBILE_MARKERS: [&str; 5] = ["Android", "iPhone", "iPad", "iPod", "Mobile"];
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            Layout::Mobile
        } else {
            Layout::Desktop
        }
    }
}

/// Physics world settings handed to the host engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Downward gravity (engine units)
    pub gravity_y: f32,
    /// Let resting bodies sleep
    pub enable_sleeping: bool,
    pub background: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

impl WorldConfig {
    pub fn desktop() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            gravity_y: 0.2,
            enable_sleeping: true,
            background: "#FFF".to_string(),
        }
    }

    /// Full-viewport world. Phones step slower, so gravity is stronger.
    pub fn mobile(viewport_w: f32, viewport_h: f32) -> Self {
        Self {
            width: viewport_w,
            height: viewport_h,
            gravity_y: 1.2,
            ..Self::desktop()
        }
    }

    pub fn for_layout(layout: Layout, viewport: (f32, f32)) -> Self {
        match layout {
            Layout::Desktop => Self::desktop(),
            Layout::Mobile => Self::mobile(viewport.0, viewport.1),
        }
    }
}

/// Inclusive float range used for randomized spawn velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanF32 {
    pub min: f32,
    pub max: f32,
}

impl SpanF32 {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn ordered(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            Self::new(self.max, self.min)
        }
    }
}

/// Game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub santa_speed: f32,
    pub santa_size: f32,
    pub santa_start: Vec2,
    pub item_size: f32,
    pub drop_period_ms: u32,
    pub history_capacity: usize,
    pub present_odds: u32,
    pub reindeer_odds: u32,
    pub present_points: u32,
    pub reindeer_points: u32,
    pub difficulty_step: u64,
    pub spawn_vel_x: SpanF32,
    pub spawn_vel_y: SpanF32,
    pub repel_speed_x: f32,
    pub repel_lift: f32,
    pub world: WorldConfig,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            santa_speed: SANTA_MOVE_SPEED,
            santa_size: SANTA_SIZE,
            santa_start: Vec2::new(SANTA_START_X, SANTA_START_Y),
            item_size: ITEM_SIZE,
            drop_period_ms: DROP_ITEM_DELAY_MS,
            history_capacity: HISTORY_MAX_SIZE,
            present_odds: DROP_PRESENT_ODDS,
            reindeer_odds: DROP_REINDEER_ODDS,
            present_points: PRESENT_SCORE,
            reindeer_points: REINDEER_SCORE,
            difficulty_step: DIFFICULTY_STEP,
            spawn_vel_x: SpanF32::new(-2.0, 2.0),
            spawn_vel_y: SpanF32::new(0.0, 1.0),
            repel_speed_x: REPEL_SPEED_X,
            repel_lift: REPEL_LIFT,
            world: WorldConfig::default(),
        }
    }
}

impl Tuning {
    /// Default balance in a world sized for `layout`
    pub fn for_layout(layout: Layout, viewport: (f32, f32)) -> Self {
        Self {
            world: WorldConfig::for_layout(layout, viewport),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Apply a (possibly partial) JSON document on top of `base`. Fields the
    /// document leaves out, nested ones included, keep their `base` value.
    pub fn merge_json(json: &str, base: &Tuning) -> Result<Self, serde_json::Error> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        merge_values(&mut merged, overrides);
        serde_json::from_value::<Tuning>(merged).map(Tuning::validated)
    }

    /// Apply `json` on top of `fallback`, keeping `fallback` if it is malformed
    pub fn load_or(json: &str, fallback: Tuning) -> Self {
        match Self::merge_json(json, &fallback) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({e}), using defaults");
                fallback
            }
        }
    }

    /// Clamp values the rules cannot work with
    pub fn validated(mut self) -> Self {
        if self.present_odds < 1 {
            log::warn!("present_odds {} raised to 1", self.present_odds);
            self.present_odds = 1;
        }
        if self.reindeer_odds < 1 {
            log::warn!("reindeer_odds {} raised to 1", self.reindeer_odds);
            self.reindeer_odds = 1;
        }
        if self.history_capacity < 1 {
            log::warn!("history_capacity 0 raised to 1");
            self.history_capacity = 1;
        }
        if self.difficulty_step < 1 {
            log::warn!("difficulty_step 0 raised to 1");
            self.difficulty_step = 1;
        }
        self.santa_speed = positive_or("santa_speed", self.santa_speed.abs(), SANTA_MOVE_SPEED);
        self.santa_size = positive_or("santa_size", self.santa_size, SANTA_SIZE);
        self.item_size = positive_or("item_size", self.item_size, ITEM_SIZE);
        let desktop = WorldConfig::desktop();
        self.world.width = positive_or("world.width", self.world.width, desktop.width);
        self.world.height = positive_or("world.height", self.world.height, desktop.height);
        if self.drop_period_ms < 1 {
            log::warn!("drop_period_ms 0 raised to 1");
            self.drop_period_ms = 1;
        }
        self.spawn_vel_x = self.spawn_vel_x.ordered();
        self.spawn_vel_y = self.spawn_vel_y.ordered();
        self
    }

    /// Y coordinate of the ground
    pub fn floor_y(&self) -> f32 {
        self.world.height
    }
}

/// `value` if it is a usable positive number, else `default` with a warning
fn positive_or(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{name} {value} replaced with {default}");
        default
    }
}

/// Overlay `overrides` onto `base`, recursing into objects
fn merge_values(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
