//! Bet sizing guard: bounds raise amounts and downgrades raises that cannot
//! meet the minimum.

use crate::action::Action;
use crate::state::GameState;

const RIVER_POT_FRACTION: f64 = 0.75;
const TURN_POT_FRACTION: f64 = 1.0;
/// Largest raise as a multiple of the current bet.
const MAX_BET_MULTIPLE: f64 = 3.0;
/// Smallest raise as a multiple of the current bet.
const MIN_BET_MULTIPLE: f64 = 2.0;

/// Largest raise allowed on this street.
pub fn max_raise(state: &GameState) -> f64 {
    if state.is_river() {
        state.pot_size * RIVER_POT_FRACTION
    } else if state.is_turn() {
        state.pot_size * TURN_POT_FRACTION
    } else {
        state.pot_size
    }
}

pub fn min_raise(state: &GameState) -> f64 {
    state.current_bet * MIN_BET_MULTIPLE
}

/// Bound a raise by street, stack and bet size. A raise that ends up below
/// the minimum becomes a check (no bet outstanding) or a call.
///
/// ```
/// use poker_policy::action::Action;
/// use poker_policy::sizing::limit;
/// use poker_policy::state::GameState;
///
/// let state = GameState {
///     pot_size: 100.0, player_stack: 1000.0, bot_stack: 1000.0, current_bet: 20.0,
///     position: 0.0, stage: 3, hand_strength: 0.5,
/// };
/// assert_eq!(limit(Action::Raise { amount: 900.0 }, &state), Action::Raise { amount: 60.0 });
/// ```
pub fn limit(action: Action, state: &GameState) -> Action {
    let Action::Raise { amount } = action else {
        return action;
    };
    let clamped = amount
        .min(max_raise(state))
        .min(state.bot_stack)
        .min(state.current_bet * MAX_BET_MULTIPLE);
    if clamped < min_raise(state) {
        return if state.current_bet == 0.0 { Action::Check } else { Action::Call };
    }
    Action::Raise { amount: clamped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(stage: u8, pot: f64, stack: f64, bet: f64) -> GameState {
        GameState {
            pot_size: pot,
            player_stack: 1000.0,
            bot_stack: stack,
            current_bet: bet,
            position: 0.0,
            stage,
            hand_strength: 0.5,
        }
    }

    #[test]
    fn atomic_actions_pass_through() {
        let s = state(1, 100.0, 1000.0, 10.0);
        for a in [Action::Fold, Action::Check, Action::Call] {
            assert_eq!(limit(a, &s), a);
        }
    }

    #[test]
    fn river_caps_at_three_quarters_pot_and_triple_bet() {
        let s = state(3, 100.0, 1000.0, 20.0);
        assert_eq!(limit(Action::Raise { amount: 900.0 }, &s), Action::Raise { amount: 60.0 });
        let s = state(3, 60.0, 1000.0, 20.0);
        assert_eq!(limit(Action::Raise { amount: 900.0 }, &s), Action::Raise { amount: 45.0 });
    }

    #[test]
    fn turn_and_earlier_cap_at_pot() {
        let s = state(2, 50.0, 1000.0, 20.0);
        assert_eq!(limit(Action::Raise { amount: 900.0 }, &s), Action::Raise { amount: 50.0 });
        let s = state(0, 45.0, 1000.0, 20.0);
        assert_eq!(limit(Action::Raise { amount: 900.0 }, &s), Action::Raise { amount: 45.0 });
    }

    #[test]
    fn stack_bounds_the_raise() {
        let s = state(1, 500.0, 70.0, 30.0);
        assert_eq!(limit(Action::Raise { amount: 200.0 }, &s), Action::Raise { amount: 70.0 });
    }

    #[test]
    fn undersized_raise_downgrades_to_call() {
        let s = state(1, 100.0, 1000.0, 10.0);
        assert_eq!(limit(Action::Raise { amount: 5.0 }, &s), Action::Call);
    }

    #[test]
    fn raise_without_bet_downgrades_to_check() {
        // Triple of a zero bet caps every raise at 0, and 0 is not below the
        // zero minimum, so only a negative draft reaches the check branch.
        let s = state(1, 100.0, 1000.0, 0.0);
        assert_eq!(limit(Action::Raise { amount: 40.0 }, &s), Action::Raise { amount: 0.0 });
        assert_eq!(limit(Action::Raise { amount: -1.0 }, &s), Action::Check);
    }

    #[test]
    fn short_stack_below_minimum_calls() {
        let s = state(1, 500.0, 30.0, 20.0);
        assert_eq!(limit(Action::Raise { amount: 60.0 }, &s), Action::Call);
    }

    #[test]
    fn limiting_twice_changes_nothing() {
        let s = state(2, 300.0, 800.0, 40.0);
        let once = limit(Action::Raise { amount: 500.0 }, &s);
        assert_eq!(limit(once, &s), once);
    }
}
