use crate::action::Action;
use crate::state::GameState;

/// Whether a draft action can be put in front of the table.
///
/// Fold, check and call are always structurally legal. A raise must be for
/// a positive amount the bot can cover; NaN amounts fail both comparisons.
pub fn is_valid(action: &Action, state: &GameState) -> bool {
    action.amount().map_or(true, |amount| amount > 0.0 && amount <= state.bot_stack)
}
