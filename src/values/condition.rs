//! Boolean conditions gating effects and filtering card targets.

use serde::{Deserialize, Serialize};

use super::value::{Value, ValueContext};
use crate::cards::KeywordId;
use crate::core::GameState;

/// Comparison operator for [`Condition::Compare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
}

impl Comparison {
    #[must_use]
    pub fn apply(self, left: i64, right: i64) -> bool {
        match self {
            Comparison::Less => left < right,
            Comparison::LessOrEqual => left <= right,
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::Greater => left > right,
        }
    }
}

/// A condition checked against the state in a value context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Always,
    Never,
    Compare {
        left: Value,
        op: Comparison,
        right: Value,
    },
    /// The context card carries the keyword.
    HasKeyword(KeywordId),
    /// The context player owns the current turn.
    IsActivePlayer,
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn compare(left: impl Into<Value>, op: Comparison, right: impl Into<Value>) -> Self {
        Self::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    #[must_use]
    pub fn evaluate(&self, state: &GameState, ctx: &ValueContext) -> bool {
        match self {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Compare { left, op, right } => {
                op.apply(left.evaluate(state, ctx), right.evaluate(state, ctx))
            }
            Condition::HasKeyword(keyword) => ctx
                .card
                .and_then(|card| state.card(card))
                .is_some_and(|card| card.has_keyword(*keyword)),
            Condition::IsActivePlayer => state.current_player() == ctx.player,
            Condition::All(conditions) => conditions.iter().all(|c| c.evaluate(state, ctx)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.evaluate(state, ctx)),
            Condition::Not(inner) => !inner.evaluate(state, ctx),
        }
    }
}
