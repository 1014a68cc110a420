//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: its stat
//! templates, keywords, costs, triggered effects and activated abilities.
//! Definitions are loaded once into a [`CardRegistry`](super::CardRegistry)
//! and shared read-only by every match.
//!
//! Instance-specific data (current stats, keywords, location) lives in
//! [`RuntimeCard`](super::RuntimeCard).

use serde::{Deserialize, Serialize};

use super::instance::RuntimeKeyword;
use crate::core::stat::StatTemplate;
use crate::effects::{ActivatedAbility, Cost, Trigger, TriggeredEffect};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Fire Imp"), not a specific
/// instance in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card type identifier (creature, spell...). Opaque to the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardTypeId(pub u32);

impl CardTypeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Keyword identifier (e.g. "Impetus").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordId(pub u16);

/// Value of a keyword; most keywords use a single value 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordValueId(pub u16);

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_server::cards::{CardDefinition, CardId, CardTypeId};
/// use ccg_server::core::{StatId, StatTemplate};
///
/// let imp = CardDefinition::new(CardId::new(1), "Fire Imp", CardTypeId::new(0))
///     .with_stat(StatTemplate::new(StatId::new(0), "Attack", 2, 0, 99))
///     .with_stat(StatTemplate::new(StatId::new(1), "Health", 1, 0, 99));
///
/// assert_eq!(imp.stat_template("Health").map(|s| s.base_value), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub card_type: CardTypeId,
    #[serde(default)]
    pub stats: Vec<StatTemplate>,
    #[serde(default)]
    pub keywords: Vec<RuntimeKeyword>,
    /// Paid when the card is played from hand.
    #[serde(default)]
    pub costs: Vec<Cost>,
    /// Effects in declaration order.
    #[serde(default)]
    pub effects: Vec<TriggeredEffect>,
    #[serde(default)]
    pub abilities: Vec<ActivatedAbility>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardTypeId) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            stats: Vec::new(),
            keywords: Vec::new(),
            costs: Vec::new(),
            effects: Vec::new(),
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stat(mut self, stat: StatTemplate) -> Self {
        self.stats.push(stat);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: RuntimeKeyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.costs.push(cost);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: TriggeredEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: ActivatedAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn stat_template(&self, name: &str) -> Option<&StatTemplate> {
        self.stats.iter().find(|s| s.name == name)
    }

    /// Effects for `trigger`, sorted by declared order.
    ///
    /// The sort is stable: effects with equal order keep declaration order.
    #[must_use]
    pub fn ordered_effects(&self, trigger: &Trigger) -> Vec<&TriggeredEffect> {
        let mut effects: Vec<_> = self.effects.iter().filter(|e| &e.trigger == trigger).collect();
        effects.sort_by_key(|e| e.order);
        effects
    }
}
