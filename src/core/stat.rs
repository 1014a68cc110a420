//! Numeric stats with clamped effective values.
//!
//! A `Stat` carries a design-time `original_value`, a mutable `base_value`
//! and a list of active modifiers. The effective value is derived on every
//! read:
//!
//! ```text
//! effective = clamp(base + sum(modifiers), min, max)
//! ```
//!
//! `StatBlock` is the owning store for a player's or card's stats. It keeps
//! a single `StatId -> Stat` map plus a secondary `name -> StatId` index, so a
//! lookup by name always reaches the same object as a lookup by id.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Stat identifier. Games define what stats exist (life, mana, attack...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatId(pub u16);

impl StatId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stat({})", self.0)
    }
}

/// Design-time description of a stat, copied into every runtime instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTemplate {
    pub id: StatId,
    pub name: String,
    pub base_value: i64,
    pub min_value: i64,
    pub max_value: i64,
}

impl StatTemplate {
    /// Create a template with the given bounds.
    pub fn new(id: StatId, name: impl Into<String>, base: i64, min: i64, max: i64) -> Self {
        Self {
            id,
            name: name.into(),
            base_value: base,
            min_value: min,
            max_value: max,
        }
    }

    /// Instantiate a fresh runtime stat.
    #[must_use]
    pub fn instantiate(&self) -> Stat {
        Stat::new(self.id, self.name.clone(), self.base_value, self.min_value, self.max_value)
    }
}

/// A temporary or permanent adjustment to a stat's effective value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Signed adjustment.
    pub value: i64,
    /// Remaining turns. `None` means permanent.
    pub duration: Option<u32>,
}

impl Modifier {
    #[must_use]
    pub const fn permanent(value: i64) -> Self {
        Self { value, duration: None }
    }

    #[must_use]
    pub const fn for_turns(value: i64, turns: u32) -> Self {
        Self {
            value,
            duration: Some(turns),
        }
    }
}

/// A runtime stat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub id: StatId,
    pub name: String,
    pub original_value: i64,
    base_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    modifiers: Vec<Modifier>,
}

impl Stat {
    /// Create a stat. The base value is clamped into `[min, max]`.
    pub fn new(id: StatId, name: impl Into<String>, base: i64, min: i64, max: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            id,
            name: name.into(),
            original_value: base,
            base_value: base.clamp(min, max),
            min_value: min,
            max_value: max,
            modifiers: Vec::new(),
        }
    }

    /// Current unmodified value.
    #[must_use]
    pub fn base_value(&self) -> i64 {
        self.base_value
    }

    /// Set the base value, clamped into `[min, max]`.
    pub fn set_base_value(&mut self, value: i64) {
        self.base_value = value.clamp(self.min_value, self.max_value);
    }

    /// Add a delta to the base value (clamped).
    pub fn modify_base_value(&mut self, delta: i64) {
        self.set_base_value(self.base_value.saturating_add(delta));
    }

    /// Sum of all active modifiers.
    #[must_use]
    pub fn modifier_total(&self) -> i64 {
        self.modifiers.iter().map(|m| m.value).sum()
    }

    /// Base adjusted by modifiers, clamped into `[min, max]`.
    #[must_use]
    pub fn effective_value(&self) -> i64 {
        self.base_value
            .saturating_add(self.modifier_total())
            .clamp(self.min_value, self.max_value)
    }

    /// How much can be paid out of this stat.
    ///
    /// Payments come off the base value, so modifiers never count toward
    /// a cost even when they raise the effective value.
    #[must_use]
    pub fn spendable(&self) -> i64 {
        self.effective_value()
            .min(self.base_value.saturating_sub(self.min_value))
            .max(0)
    }

    /// Active modifiers.
    #[must_use]
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Count down timed modifiers by one turn, dropping expired ones.
    ///
    /// Returns the number of modifiers removed.
    pub fn tick_modifiers(&mut self) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain_mut(|m| match m.duration.as_mut() {
            None => true,
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns > 0
            }
        });
        before - self.modifiers.len()
    }
}

/// Owning stat store with a name index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    stats: FxHashMap<StatId, Stat>,
    names: FxHashMap<String, StatId>,
}

impl StatBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from templates.
    pub fn from_templates<'a>(templates: impl IntoIterator<Item = &'a StatTemplate>) -> Self {
        let mut block = Self::new();
        for template in templates {
            block.insert(template.instantiate());
        }
        block
    }

    /// Insert a stat, replacing any stat with the same id.
    pub fn insert(&mut self, stat: Stat) {
        if let Some(previous) = self.stats.get(&stat.id) {
            self.names.remove(&previous.name);
        }
        self.names.insert(stat.name.clone(), stat.id);
        self.stats.insert(stat.id, stat);
    }

    #[must_use]
    pub fn get(&self, id: StatId) -> Option<&Stat> {
        self.stats.get(&id)
    }

    pub fn get_mut(&mut self, id: StatId) -> Option<&mut Stat> {
        self.stats.get_mut(&id)
    }

    /// Look up a stat through the name index.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Stat> {
        self.names.get(name).and_then(|id| self.stats.get(id))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Stat> {
        let id = *self.names.get(name)?;
        self.stats.get_mut(&id)
    }

    /// Resolve a stat name to its id.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<StatId> {
        self.names.get(name).copied()
    }

    /// Effective value of a stat, if present.
    #[must_use]
    pub fn effective(&self, id: StatId) -> Option<i64> {
        self.get(id).map(Stat::effective_value)
    }

    /// Iterate stats in id order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Stat> {
        let mut stats: Vec<_> = self.stats.values().collect();
        stats.sort_by_key(|s| s.id);
        stats.into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Stat> {
        self.stats.values_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Tick every stat's timed modifiers. Returns how many expired.
    pub fn tick_modifiers(&mut self) -> usize {
        self.stats.values_mut().map(Stat::tick_modifiers).sum()
    }
}
