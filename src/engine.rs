//! Policy engine: the single decision entry point the game engine calls.
//!
//! The engine owns its lifecycle. It starts uninitialized, makes exactly one
//! attempt to load parameters, and then either serves network decisions
//! (`Ready`) or latches into `FallbackOnly` for the rest of its life. Every
//! failure on the network path degrades to the heuristic strategy, so
//! [`PolicyEngine::decide`] always returns a legal action.

use crate::action::Action;
use crate::encoder::{encode, EncodingError};
use crate::fallback::{fallback, RandomSource, SeededRandom};
use crate::interpret::interpret;
use crate::network::{InferenceError, PolicyNetwork};
use crate::params::ParameterSource;
use crate::sizing::limit;
use crate::state::GameState;
use crate::validate::is_valid;
use core::fmt;
use tracing::{debug, info, warn};

/// Lifecycle of a [`PolicyEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Uninitialized,
    Ready,
    FallbackOnly,
}

/// Failure on the network path for a single decision.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecisionError {
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Why a decision came from the heuristic strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// No load attempt has been made yet.
    Uninitialized,
    /// The load attempt failed; the network is permanently disabled.
    FallbackOnly,
    Failed(DecisionError),
    /// The interpreter drafted a structurally illegal action.
    InvalidDraft(Action),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Uninitialized => f.write_str("engine not initialized"),
            FallbackReason::FallbackOnly => f.write_str("fallback-only mode"),
            FallbackReason::Failed(e) => write!(f, "{e}"),
            FallbackReason::InvalidDraft(a) => write!(f, "invalid draft action ({a})"),
        }
    }
}

/// Which path produced a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionSource {
    Network,
    Fallback(FallbackReason),
}

/// An action together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub source: DecisionSource,
}

enum Backend {
    Uninitialized,
    Ready(PolicyNetwork),
    FallbackOnly,
}

/// Decision engine for one bot seat. Construct it once, initialize it once,
/// and pass it to whatever drives the table.
pub struct PolicyEngine {
    backend: Backend,
    rng: Box<dyn RandomSource>,
    last_state: Option<GameState>,
}

impl fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("mode", &self.mode())
            .field("last_state", &self.last_state)
            .finish()
    }
}

impl PolicyEngine {
    /// An uninitialized engine drawing fallback randomness from `rng`.
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self { backend: Backend::Uninitialized, rng, last_state: None }
    }

    /// An uninitialized engine with ChaCha randomness; `None` seeds from the OS.
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self::new(Box::new(SeededRandom::new(seed)))
    }

    pub fn mode(&self) -> Mode {
        match self.backend {
            Backend::Uninitialized => Mode::Uninitialized,
            Backend::Ready(_) => Mode::Ready,
            Backend::FallbackOnly => Mode::FallbackOnly,
        }
    }

    /// The state passed to the most recent [`decide`](Self::decide) call.
    pub fn last_state(&self) -> Option<&GameState> {
        self.last_state.as_ref()
    }

    /// Make the single load attempt. Later calls leave the mode untouched.
    pub fn initialize(&mut self, source: &dyn ParameterSource) -> Mode {
        if !matches!(self.backend, Backend::Uninitialized) {
            debug!(mode = ?self.mode(), "policy engine already initialized");
            return self.mode();
        }
        let origin = source.describe();
        info!(source = %origin, "loading policy parameters");
        self.backend = match source.fetch() {
            Ok(params) => {
                info!(source = %origin, "policy network ready");
                Backend::Ready(PolicyNetwork::new(params))
            }
            Err(e) => {
                warn!(source = %origin, error = %e, "parameter load failed, using fallback strategy only");
                Backend::FallbackOnly
            }
        };
        self.mode()
    }

    /// Choose an action for `state`. Always legal; never fails.
    pub fn decide(&mut self, state: &GameState) -> Action {
        self.decide_traced(state).action
    }

    /// Like [`decide`](Self::decide), but also reports which path decided.
    pub fn decide_traced(&mut self, state: &GameState) -> Decision {
        self.last_state = Some(*state);

        let reason = match &self.backend {
            Backend::Uninitialized => FallbackReason::Uninitialized,
            Backend::FallbackOnly => FallbackReason::FallbackOnly,
            Backend::Ready(network) => match draft(network, state) {
                Ok(action) if is_valid(&action, state) => {
                    let action = limit(action, state);
                    debug!(%action, "network decision");
                    return Decision { action, source: DecisionSource::Network };
                }
                Ok(action) => FallbackReason::InvalidDraft(action),
                Err(e) => {
                    warn!(error = %e, "network path failed");
                    FallbackReason::Failed(e)
                }
            },
        };

        let action = fallback(state, self.rng.as_mut());
        debug!(%action, %reason, "fallback decision");
        Decision { action, source: DecisionSource::Fallback(reason) }
    }
}

fn draft(network: &PolicyNetwork, state: &GameState) -> Result<Action, DecisionError> {
    let features = encode(state)?;
    let scores = network.infer(&features)?;
    Ok(interpret(&scores, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::ScriptedRandom;
    use crate::params::{LoadError, ModelParameters, HIDDEN_DIM, INPUT_DIM, OUTPUT_DIM};
    use std::cell::Cell;

    /// Parameters whose output is just the last-layer bias, peaked at `bucket`.
    fn peaked(bucket: usize) -> ModelParameters {
        let mut bias = vec![0.0; OUTPUT_DIM];
        bias[bucket] = 1.0;
        ModelParameters::from_layers([
            (vec![0.0; INPUT_DIM * HIDDEN_DIM], vec![0.0; HIDDEN_DIM]),
            (vec![0.0; HIDDEN_DIM * HIDDEN_DIM], vec![0.0; HIDDEN_DIM]),
            (vec![0.0; HIDDEN_DIM * OUTPUT_DIM], bias),
        ])
        .unwrap()
    }

    struct Failing {
        calls: Cell<usize>,
    }

    impl ParameterSource for Failing {
        fn describe(&self) -> String {
            "failing".into()
        }
        fn fetch(&self) -> Result<ModelParameters, LoadError> {
            self.calls.set(self.calls.get() + 1);
            Err(LoadError::MissingKey("model_weights".into()))
        }
    }

    fn engine(draws: &[f64]) -> PolicyEngine {
        PolicyEngine::new(Box::new(ScriptedRandom::new(draws.to_vec())))
    }

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
    fn uninitialized_engine_falls_back_and_records_state() {
        let mut e = engine(&[0.1]);
        let s = state(1, 100.0, 1000.0, 20.0);
        let d = e.decide_traced(&s);
        assert_eq!(d.action, Action::Fold);
        assert_eq!(d.source, DecisionSource::Fallback(FallbackReason::Uninitialized));
        assert_eq!(e.last_state(), Some(&s));
        assert_eq!(e.mode(), Mode::Uninitialized);
    }

    #[test]
    fn successful_load_serves_network_decisions() {
        let mut e = engine(&[0.0]);
        assert_eq!(e.initialize(&peaked(2)), Mode::Ready);
        let d = e.decide_traced(&state(1, 100.0, 1000.0, 20.0));
        assert_eq!(d, Decision { action: Action::Call, source: DecisionSource::Network });
    }

    #[test]
    fn failed_load_latches_fallback_only() {
        let source = Failing { calls: Cell::new(0) };
        let mut e = engine(&[0.5]);
        assert_eq!(e.initialize(&source), Mode::FallbackOnly);
        assert_eq!(e.initialize(&peaked(2)), Mode::FallbackOnly);
        assert_eq!(e.initialize(&source), Mode::FallbackOnly);
        assert_eq!(source.calls.get(), 1);

        let d = e.decide_traced(&state(1, 100.0, 1000.0, 20.0));
        assert_eq!(d.source, DecisionSource::Fallback(FallbackReason::FallbackOnly));
    }

    #[test]
    fn ready_engine_ignores_reinitialization() {
        let source = Failing { calls: Cell::new(0) };
        let mut e = engine(&[0.5]);
        e.initialize(&peaked(1));
        assert_eq!(e.initialize(&source), Mode::Ready);
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn encoding_failure_falls_back_for_that_call_only() {
        let mut e = engine(&[0.5]);
        e.initialize(&peaked(2));
        let bad = GameState { hand_strength: f64::NAN, ..state(1, 100.0, 1000.0, 20.0) };
        let d = e.decide_traced(&bad);
        assert!(matches!(
            d.source,
            DecisionSource::Fallback(FallbackReason::Failed(DecisionError::Encoding(_)))
        ));
        assert_eq!(e.mode(), Mode::Ready);
        assert_eq!(e.decide_traced(&state(1, 100.0, 1000.0, 20.0)).source, DecisionSource::Network);
    }

    #[test]
    fn zero_bet_raise_draft_is_rejected() {
        let mut e = engine(&[0.1]);
        e.initialize(&peaked(20));
        let d = e.decide_traced(&state(1, 200.0, 1000.0, 0.0));
        assert_eq!(
            d.source,
            DecisionSource::Fallback(FallbackReason::InvalidDraft(Action::Raise { amount: 0.0 }))
        );
        assert_eq!(d.action, Action::Check);
    }

    #[test]
    fn network_raise_is_limited() {
        let mut e = engine(&[0.0]);
        e.initialize(&peaked(40));
        let d = e.decide_traced(&state(3, 100.0, 1000.0, 20.0));
        // Drafted at min(75, 1000, 40) = 40, kept at 40 by the guard.
        assert_eq!(d, Decision { action: Action::Raise { amount: 40.0 }, source: DecisionSource::Network });
    }
}
