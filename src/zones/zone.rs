//! A single per-player zone holding runtime cards.
//!
//! Cards are stored front to back; index 0 is the top (the next card drawn
//! from a library). Unordered zones use the same storage and simply don't
//! care about positions.

use serde::{Deserialize, Serialize};

use crate::cards::RuntimeCard;
use crate::core::config::{ZoneConfig, ZoneId, ZoneVisibility};
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Position for inserting a card into a zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Front of the zone (top of library).
    Top,
    /// Back of the zone.
    #[default]
    Bottom,
    /// Insert at a specific index from the top, clamped to the zone size.
    Index(usize),
}

/// An owned, ordered container of cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub owner: PlayerId,
    pub visibility: ZoneVisibility,
    pub ordered: bool,
    /// Maximum cards allowed. `None` for unlimited.
    pub capacity: Option<usize>,
    cards: Vec<RuntimeCard>,
}

impl Zone {
    /// Create an empty zone for `owner` from its layout.
    pub fn from_config(config: &ZoneConfig, owner: PlayerId) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            owner,
            visibility: config.visibility,
            ordered: config.ordered,
            capacity: config.max_cards,
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Is the zone at capacity?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|max| self.cards.len() >= max)
    }

    /// How many more cards fit. `usize::MAX` when unlimited.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity
            .map_or(usize::MAX, |max| max.saturating_sub(self.cards.len()))
    }

    /// Cards from top to bottom.
    #[must_use]
    pub fn cards(&self) -> &[RuntimeCard] {
        &self.cards
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RuntimeCard> {
        self.cards.iter_mut()
    }

    /// The top card, if any.
    #[must_use]
    pub fn top(&self) -> Option<&RuntimeCard> {
        self.cards.first()
    }

    #[must_use]
    pub fn contains(&self, instance: InstanceId) -> bool {
        self.position_of(instance).is_some()
    }

    #[must_use]
    pub fn position_of(&self, instance: InstanceId) -> Option<usize> {
        self.cards.iter().position(|c| c.instance_id == instance)
    }

    #[must_use]
    pub fn get(&self, instance: InstanceId) -> Option<&RuntimeCard> {
        self.cards.iter().find(|c| c.instance_id == instance)
    }

    pub fn get_mut(&mut self, instance: InstanceId) -> Option<&mut RuntimeCard> {
        self.cards.iter_mut().find(|c| c.instance_id == instance)
    }

    /// Insert a card. Capacity is checked by callers, which know whether the
    /// move should be refused.
    pub fn insert(&mut self, card: RuntimeCard, position: ZonePosition) {
        match position {
            ZonePosition::Top => self.cards.insert(0, card),
            ZonePosition::Bottom => self.cards.push(card),
            ZonePosition::Index(i) => {
                let idx = i.min(self.cards.len());
                self.cards.insert(idx, card);
            }
        }
    }

    /// Remove a card by instance, keeping the order of the rest.
    pub fn remove(&mut self, instance: InstanceId) -> Option<RuntimeCard> {
        let idx = self.position_of(instance)?;
        Some(self.cards.remove(idx))
    }

    /// Remove up to `n` cards from the top, top first.
    pub fn take_top(&mut self, n: usize) -> Vec<RuntimeCard> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }
}
