//! Betting actions returned to the game engine.
//!
//! At the boundary an action serializes as one of the bare tags `"fold"`,
//! `"check"`, `"call"`, or as `{"action": "raise", "amount": N}`.

use core::fmt;
use serde::{Deserialize, Serialize};

/// A betting decision for the bot's seat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActionDoc", into = "ActionDoc")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise { amount: f64 },
}

impl Action {
    /// Raise amount, if this is a raise.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Action::Raise { amount } => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Raise { amount } => write!(f, "raise {amount}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Tag {
    Fold,
    Check,
    Call,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RaiseTag {
    Raise,
}

#[derive(Serialize, Deserialize)]
struct RaiseDoc {
    action: RaiseTag,
    amount: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ActionDoc {
    Tag(Tag),
    Raise(RaiseDoc),
}

impl From<ActionDoc> for Action {
    fn from(doc: ActionDoc) -> Self {
        match doc {
            ActionDoc::Tag(Tag::Fold) => Action::Fold,
            ActionDoc::Tag(Tag::Check) => Action::Check,
            ActionDoc::Tag(Tag::Call) => Action::Call,
            ActionDoc::Raise(RaiseDoc { amount, .. }) => Action::Raise { amount },
        }
    }
}

impl From<Action> for ActionDoc {
    fn from(action: Action) -> Self {
        match action {
            Action::Fold => ActionDoc::Tag(Tag::Fold),
            Action::Check => ActionDoc::Tag(Tag::Check),
            Action::Call => ActionDoc::Tag(Tag::Call),
            Action::Raise { amount } => ActionDoc::Raise(RaiseDoc { action: RaiseTag::Raise, amount }),
        }
    }
}
