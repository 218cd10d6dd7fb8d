//! Maps network scores to a draft action.
//!
//! Buckets 0..=2 are fold/check/call; every higher bucket is a raise. On the
//! river fold is never drafted and raise sizing is capped at three quarters of
//! the pot.

use crate::action::Action;
use crate::network::ScoreVector;
use crate::state::GameState;

/// Chips added to the raise estimate per bucket above call.
const RAISE_STEP: f64 = 50.0;
const RIVER_POT_FRACTION: f64 = 0.75;

/// Turn scores into a draft action. The result still needs validation and
/// sizing before it can be returned to the table.
pub fn interpret(scores: &ScoreVector, state: &GameState) -> Action {
    let index = scores.argmax();
    if state.is_river() {
        return match index {
            0 | 1 => Action::Check,
            2 => Action::Call,
            _ => Action::Raise { amount: river_raise(state) },
        };
    }
    match index {
        0 => Action::Fold,
        1 => Action::Check,
        2 => Action::Call,
        _ => Action::Raise { amount: bucket_raise(index, state) },
    }
}

fn river_raise(state: &GameState) -> f64 {
    (state.pot_size * RIVER_POT_FRACTION).min(state.bot_stack).min(state.current_bet * 2.0)
}

/// The bucket estimate is bounded by stack and pot, then pinned to twice the
/// current bet. With no bet outstanding this yields 0, which validation rejects.
fn bucket_raise(index: usize, state: &GameState) -> f64 {
    let estimate = ((index - 2) as f64 * RAISE_STEP).min(state.bot_stack).min(state.pot_size);
    let double_bet = state.current_bet * 2.0;
    estimate.min(double_bet).max(double_bet)
}
