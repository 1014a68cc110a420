//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition the server knows. It is
//! built once at startup, wrapped in an `Arc` and shared read-only by all
//! matches. Lookups work by `CardId` and by name; effects that create cards
//! refer to them by name.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::error::{Error, Result};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_server::cards::{CardDefinition, CardId, CardRegistry, CardTypeId};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::new(CardId::new(1), "Fire Imp", CardTypeId::new(0)))
///     .unwrap();
///
/// assert_eq!(registry.by_name("Fire Imp").map(|c| c.id), Some(CardId::new(1)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    names: FxHashMap<String, CardId>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition. Ids and names must be unique.
    pub fn register(&mut self, card: CardDefinition) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(Error::InvalidConfig(format!("{} already registered", card.id)));
        }
        if self.names.contains_key(&card.name) {
            return Err(Error::InvalidConfig(format!(
                "card name '{}' already registered",
                card.name
            )));
        }
        self.names.insert(card.name.clone(), card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Build a registry from a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let cards: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.names.get(name).and_then(|id| self.cards.get(id))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}
