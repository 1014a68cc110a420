//! Effects, costs, targeting and the solver that applies them.
//!
//! Card definitions carry declarative data ([`TriggeredEffect`],
//! [`ActivatedAbility`], [`Cost`]); the [`EffectSolver`] interprets that data
//! against a [`GameState`](crate::core::GameState).

mod cost;
mod effect;
mod solver;
mod targeting;

pub use cost::{check_costs, pay_costs_then, Cost, Deductions};
pub use effect::{ActivatedAbility, CardEffect, Effect, PlayerEffect, Trigger, TriggeredEffect};
pub use solver::{EffectSolver, MAX_TRIGGER_DEPTH};
pub use targeting::{card_target_info, player_target_info, CardTarget, PlayerTarget, Side, TargetInfo};
