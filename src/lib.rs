//! Santa Drop - a one-screen arcade game
//!
//! Santa walks across the top of the screen and drops presents (click them
//! before they land) and reindeer (let them land, never click them).
//!
//! Core modules:
//! - `sim`: Deterministic gameplay rules (drop scheduling, spawning, collisions, scoring)
//! - `round`: Round controller gluing the rules to an engine
//! - `platform`: Engine capability trait plus browser/headless hosts
//! - `tuning`: Data-driven game balance
//! - `ui`: Game over overlay layout

pub mod platform;
pub mod round;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use round::{RoundController, RoundEvent};
pub use tuning::{Layout, Tuning, WorldConfig};

/// Game configuration constants
pub mod consts {
    /// Santa horizontal speed (pixels per frame)
    pub const SANTA_MOVE_SPEED: f32 = 5.0;
    /// Santa display size (square)
    pub const SANTA_SIZE: f32 = 100.0;
    /// Santa spawn position
    pub const SANTA_START_X: f32 = 50.0;
    pub const SANTA_START_Y: f32 = 60.0;

    /// Falling item display size (square)
    pub const ITEM_SIZE: f32 = 100.0;

    /// Period of the drop timer in milliseconds
    pub const DROP_ITEM_DELAY_MS: u32 = 200;
    /// Number of recent drop decisions remembered
    pub const HISTORY_MAX_SIZE: usize = 10;

    /// Initial "1 in N" odds of dropping on a tick
    pub const DROP_PRESENT_ODDS: u32 = 20;
    /// "1 in N" odds that a drop is a reindeer
    pub const DROP_REINDEER_ODDS: u32 = 5;

    /// Points for clicking a present
    pub const PRESENT_SCORE: u32 = 10;
    /// Points for letting a reindeer land
    pub const REINDEER_SCORE: u32 = 10;
    /// Present odds tighten each time the score enters a new band of this size
    pub const DIFFICULTY_STEP: u64 = 50;

    /// Horizontal push applied to two colliding items
    pub const REPEL_SPEED_X: f32 = 2.0;
    /// Upward kick applied to two colliding items
    pub const REPEL_LIFT: f32 = 5.0;
}

/// Roll a "1 in `odds`" chance. Odds below 1 are treated as 1 (always hits).
#[inline]
pub fn lottery<R: rand::Rng + ?Sized>(rng: &mut R, odds: u32) -> bool {
    rng.random_range(0..odds.max(1)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lottery_odds_one_always_hits() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!((0..100).all(|_| lottery(&mut rng, 1)));
        assert!((0..100).all(|_| lottery(&mut rng, 0)));
    }

    #[test]
    fn test_lottery_rate_is_roughly_one_in_n() {
        let mut rng = Pcg32::seed_from_u64(42);
        let hits = (0..10_000).filter(|_| lottery(&mut rng, 4)).count();
        assert!((2_000..3_000).contains(&hits), "hits = {hits}");
    }
}
