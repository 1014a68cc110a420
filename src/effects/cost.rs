//! Costs and the pay-then-resolve transaction.
//!
//! Playing a card or activating an ability first pays its costs and only then
//! resolves its effects. [`pay_costs_then`] is the one place that ordering
//! lives: it checks every cost against what the payer can spend, refuses the
//! whole transaction if any is unaffordable, deducts all of them from the
//! base values, and finally runs the effect closure.
//!
//! A stat can spend the lower of its effective value and its base above the
//! minimum. Temporary bonuses raise neither the base nor the amount payable.
//!
//! An empty cost list is free.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameAction, GameState, Outcome, Rejection, Stat, StatId};
use crate::values::{Value, ValueContext};

/// A price paid by the acting player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Pay `value` from a player stat (usually mana).
    PayStat { stat: StatId, value: Value },
}

impl Cost {
    /// A fixed stat payment.
    pub fn pay_stat(stat: StatId, amount: i64) -> Self {
        Cost::PayStat {
            stat,
            value: Value::Constant(amount),
        }
    }
}

/// Amount to deduct per stat.
pub type Deductions = SmallVec<[(StatId, i64); 2]>;

/// Check that the payer can afford every cost.
///
/// Costs on the same stat add up. Negative amounts count as 0.
pub fn check_costs(state: &GameState, payer: &ValueContext, costs: &[Cost]) -> Outcome<Deductions> {
    let mut deductions = Deductions::new();
    for cost in costs {
        let Cost::PayStat { stat, value } = cost;
        let amount = value.evaluate(state, payer).max(0);
        match deductions.iter_mut().find(|(s, _)| s == stat) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => deductions.push((*stat, amount)),
        }
    }

    let player = state.require_player(payer.player)?;
    for &(stat, required) in &deductions {
        let available = player
            .stats
            .get(stat)
            .map(Stat::spendable)
            .ok_or(Rejection::StatNotFound { stat })?;
        if available < required {
            return Err(Rejection::InsufficientResources {
                stat,
                required,
                available,
            });
        }
    }
    Ok(deductions)
}

/// Pay `costs` for `payer`, then run `then`.
///
/// Nothing is mutated when a cost can't be paid. Once paid, the costs stay
/// paid even if `then` turns out to do nothing.
pub fn pay_costs_then<T>(
    state: &mut GameState,
    payer: &ValueContext,
    costs: &[Cost],
    then: impl FnOnce(&mut GameState) -> T,
) -> Outcome<T> {
    let deductions = check_costs(state, payer, costs)?;

    for (stat, amount) in deductions {
        if amount == 0 {
            continue;
        }
        let player = state.require_player_mut(payer.player)?;
        if let Some(s) = player.stats.get_mut(stat) {
            s.modify_base_value(-amount);
        }
        state.record(
            payer.player,
            GameAction::ModifyPlayerStat {
                player: payer.player,
                stat,
                delta: -amount,
            },
        );
    }

    Ok(then(state))
}
