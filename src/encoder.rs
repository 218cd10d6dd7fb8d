//! State encoder: game state -> fixed-length network input.
//!
//! Layout, in order:
//!
//! | idx | feature          | transform                     |
//! |-----|------------------|-------------------------------|
//! | 0   | pot size         | `min(pot / 1000, 1)`          |
//! | 1   | opponent stack   | `min(stack / 1000, 1)`        |
//! | 2   | bot stack        | `min(stack / 1000, 1)`        |
//! | 3   | current bet      | `min(bet / 100, 1)`           |
//! | 4   | position         | unscaled                      |
//! | 5   | stage            | `min(stage, 3)`               |
//! | 6   | hand strength    | `clamp(strength, 0, 1)`       |

use crate::params::INPUT_DIM;
use crate::state::{GameState, UNKNOWN_STAGE};

const STACK_NORM: f64 = 1000.0;
const BET_NORM: f64 = 100.0;
const MAX_STAGE: u8 = 3;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodingError {
    #[error("game state field `{0}` is not a number")]
    NotANumber(&'static str),
    #[error("game state has no valid stage")]
    UnknownStage,
}

/// Network input derived from one game state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; INPUT_DIM]);

impl FeatureVector {
    pub fn from_array(values: [f64; INPUT_DIM]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_array(self) -> [f64; INPUT_DIM] {
        self.0
    }
}

/// Encode `state` into the network's input layout.
///
/// ```
/// use poker_policy::encoder::encode;
/// use poker_policy::state::GameState;
///
/// let state = GameState {
///     pot_size: 250.0, player_stack: 2000.0, bot_stack: 400.0, current_bet: 50.0,
///     position: 1.0, stage: 2, hand_strength: 1.4,
/// };
/// let f = encode(&state).unwrap();
/// assert_eq!(f.as_slice(), &[0.25, 1.0, 0.4, 0.5, 1.0, 2.0, 1.0]);
/// ```
pub fn encode(state: &GameState) -> Result<FeatureVector, EncodingError> {
    let pot = number("potSize", state.pot_size)?;
    let player_stack = number("playerStack", state.player_stack)?;
    let bot_stack = number("botStack", state.bot_stack)?;
    let current_bet = number("currentBet", state.current_bet)?;
    let position = number("position", state.position)?;
    if state.stage == UNKNOWN_STAGE {
        return Err(EncodingError::UnknownStage);
    }
    let hand_strength = number("handStrength", state.hand_strength)?;

    Ok(FeatureVector([
        (pot / STACK_NORM).min(1.0),
        (player_stack / STACK_NORM).min(1.0),
        (bot_stack / STACK_NORM).min(1.0),
        (current_bet / BET_NORM).min(1.0),
        position,
        f64::from(state.stage.min(MAX_STAGE)),
        hand_strength.clamp(0.0, 1.0),
    ]))
}

// `f64::min` silently discards NaN, so it has to be rejected up front.
fn number(field: &'static str, value: f64) -> Result<f64, EncodingError> {
    if value.is_nan() {
        return Err(EncodingError::NotANumber(field));
    }
    Ok(value)
}
