//! Drop scheduling
//!
//! Decides on every drop timer tick whether Santa lets go of something.
//! Long dry streaks are broken by force and two drops never happen on
//! consecutive ticks.

use rand::Rng;

use super::state::{DropDecision, DropHistory};
use crate::lottery;

/// Decide whether to drop on this tick and record the outcome
pub fn should_drop<R: Rng + ?Sized>(
    history: &mut DropHistory,
    present_odds: u32,
    rng: &mut R,
) -> DropDecision {
    let forced = history.is_dry_streak();

    let decision = if !forced && !lottery(rng, present_odds) {
        DropDecision::NoDrop
    } else if history.last() == Some(DropDecision::Drop) {
        // Never two in a row
        DropDecision::NoDrop
    } else {
        DropDecision::Drop
    };

    history.push(decision);
    decision
}
