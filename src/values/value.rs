//! Integer expressions evaluated against game state.
//!
//! Effects and costs carry `Value`s instead of raw numbers so a card can say
//! "deal damage equal to the number of cards in your hand". Evaluation is
//! pure and never fails: a missing stat, zone or card evaluates to 0.

use serde::{Deserialize, Serialize};

use crate::core::{CardRef, GameState, PlayerId, StatId};

/// Who "you" and "this card" refer to while evaluating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueContext {
    /// Controller of the effect.
    pub player: PlayerId,
    /// Source card, if the effect comes from a card.
    pub card: Option<CardRef>,
}

impl ValueContext {
    #[must_use]
    pub const fn player(player: PlayerId) -> Self {
        Self { player, card: None }
    }

    #[must_use]
    pub const fn card(card: CardRef) -> Self {
        Self {
            player: card.owner,
            card: Some(card),
        }
    }
}

/// An integer expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Constant(i64),
    /// Effective value of a stat of the context player.
    PlayerStat(StatId),
    /// Effective value of a stat of the context player's opponent.
    OpponentStat(StatId),
    /// Effective value of a stat of the context card.
    CardStat(StatId),
    /// Cards in the context player's named zone.
    ZoneCount(String),
    /// Cards in the opponent's named zone.
    OpponentZoneCount(String),
    Sum(Vec<Value>),
    Difference(Box<Value>, Box<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Constant(0)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Constant(value)
    }
}

impl Value {
    /// `left - right`.
    pub fn difference(left: Value, right: Value) -> Self {
        Value::Difference(Box::new(left), Box::new(right))
    }

    /// Evaluate in the given context.
    #[must_use]
    pub fn evaluate(&self, state: &GameState, ctx: &ValueContext) -> i64 {
        match self {
            Value::Constant(n) => *n,
            Value::PlayerStat(stat) => player_stat(state, ctx.player, *stat),
            Value::OpponentStat(stat) => player_stat(state, state.opponent_of(ctx.player), *stat),
            Value::CardStat(stat) => ctx
                .card
                .and_then(|card| state.card(card))
                .and_then(|card| card.stats.effective(*stat))
                .unwrap_or(0),
            Value::ZoneCount(zone) => zone_count(state, ctx.player, zone),
            Value::OpponentZoneCount(zone) => zone_count(state, state.opponent_of(ctx.player), zone),
            Value::Sum(values) => values
                .iter()
                .fold(0i64, |acc, v| acc.saturating_add(v.evaluate(state, ctx))),
            Value::Difference(left, right) => left
                .evaluate(state, ctx)
                .saturating_sub(right.evaluate(state, ctx)),
        }
    }
}

fn player_stat(state: &GameState, player: PlayerId, stat: StatId) -> i64 {
    state
        .player(player)
        .and_then(|p| p.stats.effective(stat))
        .unwrap_or(0)
}

fn zone_count(state: &GameState, player: PlayerId, zone: &str) -> i64 {
    state
        .player(player)
        .map_or(0, |p| p.zones.count(zone) as i64)
}
