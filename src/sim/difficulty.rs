//! Scoring and difficulty ramp

use super::state::RoundState;

/// Result of awarding points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChange {
    pub points: u32,
    pub total: u64,
    /// New present odds if this award tightened them
    pub raised_to: Option<u32>,
}

/// Add points and tighten the present odds when the score enters a new band
/// of `step` points. At most one tightening per award; odds never go below 1.
pub fn award_points(state: &mut RoundState, points: u32, step: u64) -> ScoreChange {
    let step = step.max(1);
    let before = state.score / step;
    state.score += u64::from(points);
    let after = state.score / step;

    let mut raised_to = None;
    if after != 0 && after != before && state.present_odds > 1 {
        state.present_odds -= 1;
        raised_to = Some(state.present_odds);
    }

    ScoreChange {
        points,
        total: state.score,
        raised_to,
    }
}
