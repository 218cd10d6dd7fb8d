//! poker-policy: betting decisions for an automated poker seat
//!
//! Goals:
//! - Every call yields a legal action, whatever the model or input does
//! - Deterministic inference over a small dense network (7 -> 32 -> 32 -> 41)
//! - No panics for bad input; failures degrade to a heuristic strategy
//!
//! Pipeline for one decision:
//! [`encoder`] -> [`network`] -> [`interpret`] -> [`validate`] -> [`sizing`],
//! with [`fallback`] taking over whenever a stage fails or no model is loaded.
//!
//! ## Quick start
//! ```
//! use poker_policy::action::Action;
//! use poker_policy::engine::{Mode, PolicyEngine};
//! use poker_policy::params::InlineSource;
//! use poker_policy::state::GameState;
//!
//! let mut engine = PolicyEngine::with_seed(Some(7));
//! // A document without weights fails to load and latches fallback mode.
//! assert_eq!(engine.initialize(&InlineSource("{}".into())), Mode::FallbackOnly);
//!
//! let river = GameState {
//!     pot_size: 200.0, player_stack: 800.0, bot_stack: 1000.0, current_bet: 0.0,
//!     position: 1.0, stage: 3, hand_strength: 0.9,
//! };
//! assert_eq!(engine.decide(&river), Action::Check);
//! ```
//!
//! ## CLI
//! Stream JSON game states through the engine with:
//! ```sh
//! cargo run --bin poker-policy -- --model model.json < states.jsonl
//! ```

pub mod action;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod fallback;
pub mod interpret;
pub mod logging;
pub mod network;
pub mod params;
pub mod sizing;
pub mod state;
pub mod stream;
pub mod validate;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
