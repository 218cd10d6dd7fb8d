//! Heuristic strategy used whenever the network path is unavailable.
//!
//! The river is played passively and deterministically. Earlier streets draw
//! one uniform value and pick an action from pot-odds bands.

use crate::action::Action;
use crate::state::GameState;
use crate::validate::is_valid;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Production randomness: a ChaCha stream, optionally seeded for replay.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(v) => ChaCha8Rng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                ChaCha8Rng::from_seed(seed)
            }
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self { values: values.into(), cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

/// Call on the river when the bet is at most this share of the stack.
const RIVER_CALL_STACK_SHARE: f64 = 0.3;
/// Pot odds above which calling is usually unprofitable.
const EXPENSIVE_POT_ODDS: f64 = 0.5;
const EXPENSIVE_FOLD_BAND: f64 = 0.7;
const OPEN_CHECK_BAND: f64 = 0.6;
const OPEN_POT_FRACTION: f64 = 0.5;
const FACING_FOLD_BAND: f64 = 0.4;
const FACING_CALL_BAND: f64 = 0.8;
const FACING_POT_FRACTION: f64 = 0.75;

/// Pick an action without the network. Never fails.
///
/// ```
/// use poker_policy::action::Action;
/// use poker_policy::fallback::{fallback, ScriptedRandom};
/// use poker_policy::state::GameState;
///
/// let river = GameState {
///     pot_size: 200.0, player_stack: 800.0, bot_stack: 1000.0, current_bet: 50.0,
///     position: 0.0, stage: 3, hand_strength: 0.2,
/// };
/// assert_eq!(fallback(&river, &mut ScriptedRandom::new([0.0])), Action::Call);
/// ```
pub fn fallback(state: &GameState, rng: &mut dyn RandomSource) -> Action {
    if state.is_river() {
        if state.current_bet == 0.0 {
            return Action::Check;
        }
        if state.current_bet <= state.bot_stack * RIVER_CALL_STACK_SHARE {
            return Action::Call;
        }
        return Action::Fold;
    }

    let r = rng.next_unit();
    if state.pot_odds() > EXPENSIVE_POT_ODDS {
        return if r < EXPENSIVE_FOLD_BAND { Action::Fold } else { Action::Call };
    }
    if state.current_bet == 0.0 {
        if r < OPEN_CHECK_BAND {
            return Action::Check;
        }
        let amount = (state.pot_size * OPEN_POT_FRACTION).min(state.bot_stack);
        return raise_or(amount, Action::Check, state);
    }
    if r < FACING_FOLD_BAND {
        return Action::Fold;
    }
    if r < FACING_CALL_BAND {
        return Action::Call;
    }
    let amount =
        (state.current_bet * 2.0).min(state.pot_size * FACING_POT_FRACTION).min(state.bot_stack);
    raise_or(amount, Action::Call, state)
}

// An empty pot or stack sizes the raise at zero chips.
fn raise_or(amount: f64, otherwise: Action, state: &GameState) -> Action {
    let raise = Action::Raise { amount };
    if is_valid(&raise, state) {
        raise
    } else {
        otherwise
    }
}
