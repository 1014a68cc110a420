//! Effect definitions.
//!
//! Effects are declared on card definitions and interpreted by the
//! [`EffectSolver`](super::EffectSolver). They are a closed set: every
//! effect is either a player effect applied to some players or a card effect
//! applied to some cards, and each variant expands into
//! [`GameAction`](crate::core::GameAction)s in exactly one place.
//!
//! ## Player Effects
//!
//! - `DrawCards`: library to hand
//! - `IncreaseStat` / `DecreaseStat` / `SetStat`: change a player stat's base
//! - `CreateCard`: instantiate copies of a named definition into a zone
//! - `MoveTopCards`: move the top n cards of one zone to another
//! - `ShuffleZone`: randomize a zone with the match RNG
//!
//! ## Card Effects
//!
//! - `IncreaseStat` / `DecreaseStat` / `SetStat`: change a card stat's base
//! - `AddModifier`: timed or permanent stat modifier
//! - `AddKeyword` / `RemoveKeyword`
//! - `MoveToZone`: relocate the card, firing zone triggers

use serde::{Deserialize, Serialize};

use super::cost::Cost;
use super::targeting::{CardTarget, PlayerTarget};
use crate::cards::RuntimeKeyword;
use crate::core::StatId;
use crate::values::{Condition, Value};

/// When a card effect fires.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// The card entered the named zone.
    EnterZone(String),
    /// The card left the named zone.
    LeaveZone(String),
    /// Its controller's turn started (card on the board).
    TurnStarted,
    /// Its controller's turn ended (card on the board).
    TurnEnded,
}

/// An effect applied to players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEffect {
    DrawCards { count: Value },
    IncreaseStat { stat: StatId, value: Value },
    DecreaseStat { stat: StatId, value: Value },
    SetStat { stat: StatId, value: Value },
    /// Create `copies` instances of the named card in `zone`.
    CreateCard { card: String, copies: Value, zone: String },
    MoveTopCards { count: Value, from: String, to: String },
    ShuffleZone { zone: String },
}

/// An effect applied to cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    IncreaseStat { stat: StatId, value: Value },
    DecreaseStat { stat: StatId, value: Value },
    SetStat { stat: StatId, value: Value },
    /// Add a modifier; `duration` in turns, `None` for permanent.
    AddModifier {
        stat: StatId,
        value: Value,
        duration: Option<u32>,
    },
    AddKeyword(RuntimeKeyword),
    RemoveKeyword(RuntimeKeyword),
    MoveToZone { zone: String },
}

/// A targeted effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Player {
        target: PlayerTarget,
        effect: PlayerEffect,
    },
    Card {
        target: CardTarget,
        effect: CardEffect,
    },
}

impl Effect {
    /// Shorthand for an effect on the controller.
    pub fn on_controller(effect: PlayerEffect) -> Self {
        Effect::Player {
            target: PlayerTarget::Controller,
            effect,
        }
    }

    /// Shorthand for an effect on the source card.
    pub fn on_this_card(effect: CardEffect) -> Self {
        Effect::Card {
            target: CardTarget::ThisCard,
            effect,
        }
    }

    /// Variant name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Player { effect, .. } => match effect {
                PlayerEffect::DrawCards { .. } => "DrawCards",
                PlayerEffect::IncreaseStat { .. } => "IncreasePlayerStat",
                PlayerEffect::DecreaseStat { .. } => "DecreasePlayerStat",
                PlayerEffect::SetStat { .. } => "SetPlayerStat",
                PlayerEffect::CreateCard { .. } => "CreateCard",
                PlayerEffect::MoveTopCards { .. } => "MoveTopCards",
                PlayerEffect::ShuffleZone { .. } => "ShuffleZone",
            },
            Effect::Card { effect, .. } => match effect {
                CardEffect::IncreaseStat { .. } => "IncreaseCardStat",
                CardEffect::DecreaseStat { .. } => "DecreaseCardStat",
                CardEffect::SetStat { .. } => "SetCardStat",
                CardEffect::AddModifier { .. } => "AddModifier",
                CardEffect::AddKeyword(_) => "AddKeyword",
                CardEffect::RemoveKeyword(_) => "RemoveKeyword",
                CardEffect::MoveToZone { .. } => "MoveToZone",
            },
        }
    }
}

/// An effect attached to a trigger on a card definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredEffect {
    pub trigger: Trigger,
    /// Resolution order; lower first, ties keep declaration order.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub condition: Option<Condition>,
    pub effect: Effect,
}

impl TriggeredEffect {
    pub fn new(trigger: Trigger, effect: Effect) -> Self {
        Self {
            trigger,
            order: 0,
            condition: None,
            effect,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// An ability a player can activate on a card they control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub name: String,
    #[serde(default)]
    pub costs: Vec<Cost>,
    pub effects: Vec<Effect>,
}

impl ActivatedAbility {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            costs: Vec::new(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.costs.push(cost);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}
