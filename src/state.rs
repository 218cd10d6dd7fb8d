use serde::{Deserialize, Deserializer, Serialize};

/// Stage code recorded when the document carries no usable stage.
pub const UNKNOWN_STAGE: u8 = u8::MAX;

/// Betting round, decoded from the numeric stage code the game engine sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
#[repr(u8)]
pub enum Stage {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Stage {
    /// Decode a stage code; `None` for codes outside 0..=3.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Stage::Preflop),
            1 => Some(Stage::Flop),
            2 => Some(Stage::Turn),
            3 => Some(Stage::River),
            _ => None,
        }
    }
}

/// Observed table state at a single decision point.
///
/// Owned by the caller and built fresh for every decision. Monetary values
/// are chip amounts; `hand_strength` is expected in `[0, 1]` but is clamped
/// during encoding, so out-of-range values are tolerated.
///
/// Missing or `null` fields still deserialize: numbers become NaN and the
/// stage becomes [`UNKNOWN_STAGE`], which encoding rejects, so such a state
/// is answered by the fallback strategy rather than dropped.
///
/// ```
/// use poker_policy::state::{GameState, Stage};
///
/// let json = r#"{"potSize":120,"playerStack":880,"botStack":900,
///     "currentBet":20,"position":1,"stage":3,"handStrength":0.7}"#;
/// let state: GameState = serde_json::from_str(json).unwrap();
/// assert_eq!(state.stage(), Some(Stage::River));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub pot_size: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub player_stack: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub bot_stack: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub current_bet: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub position: f64,
    #[serde(default = "missing_stage", deserialize_with = "stage_or_unknown")]
    pub stage: u8,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub hand_strength: f64,
}

fn missing_number() -> f64 {
    f64::NAN
}

fn missing_stage() -> u8 {
    UNKNOWN_STAGE
}

fn number_or_nan<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

fn stage_or_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    Ok(Option::<u8>::deserialize(d)?.unwrap_or(UNKNOWN_STAGE))
}

impl GameState {
    pub fn stage(&self) -> Option<Stage> {
        Stage::from_code(self.stage)
    }

    pub fn is_river(&self) -> bool {
        self.stage() == Some(Stage::River)
    }

    pub fn is_turn(&self) -> bool {
        self.stage() == Some(Stage::Turn)
    }

    /// Ratio of the amount to call against the pot after calling.
    pub fn pot_odds(&self) -> f64 {
        self.current_bet / (self.pot_size + self.current_bet)
    }
}
