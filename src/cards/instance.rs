//! Runtime cards - per-match card state.
//!
//! A `RuntimeCard` is created from a `CardDefinition` whenever a card enters
//! a match (deck instantiation, summons, effect-created tokens). It owns an
//! independent copy of the definition's stats and keywords, so damage and
//! buffs on one instance never leak into another.
//!
//! The owner is a back-reference by id; the card itself is owned by
//! whichever zone currently holds it.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId, KeywordId, KeywordValueId};
use crate::core::entity::{CardRef, InstanceId};
use crate::core::player::PlayerId;
use crate::core::stat::{Stat, StatBlock};

/// A keyword carried by a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeKeyword {
    pub keyword: KeywordId,
    pub value: KeywordValueId,
}

impl RuntimeKeyword {
    #[must_use]
    pub const fn new(keyword: KeywordId, value: KeywordValueId) -> Self {
        Self { keyword, value }
    }
}

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeCard {
    pub card_id: CardId,
    pub instance_id: InstanceId,
    pub owner: PlayerId,
    pub stats: StatBlock,
    /// Keywords in the order they were gained.
    pub keywords: Vec<RuntimeKeyword>,
}

impl RuntimeCard {
    /// Instantiate a definition for `owner`.
    #[must_use]
    pub fn from_definition(
        definition: &CardDefinition,
        owner: PlayerId,
        instance_id: InstanceId,
    ) -> Self {
        Self {
            card_id: definition.id,
            instance_id,
            owner,
            stats: StatBlock::from_templates(&definition.stats),
            keywords: definition.keywords.clone(),
        }
    }

    #[must_use]
    pub fn card_ref(&self) -> CardRef {
        CardRef::new(self.owner, self.instance_id)
    }

    #[must_use]
    pub fn stat(&self, name: &str) -> Option<&Stat> {
        self.stats.by_name(name)
    }

    /// Does the card carry this keyword with any value?
    #[must_use]
    pub fn has_keyword(&self, keyword: KeywordId) -> bool {
        self.keywords.iter().any(|k| k.keyword == keyword)
    }

    pub fn add_keyword(&mut self, keyword: RuntimeKeyword) {
        self.keywords.push(keyword);
    }

    /// Remove the first matching keyword. Returns whether one was removed.
    pub fn remove_keyword(&mut self, keyword: RuntimeKeyword) -> bool {
        match self.keywords.iter().position(|k| *k == keyword) {
            Some(idx) => {
                self.keywords.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Keyword-value pairs as flat ids, for the wire.
    #[must_use]
    pub fn keyword_pairs(&self) -> Vec<(u16, u16)> {
        self.keywords
            .iter()
            .map(|k| (k.keyword.0, k.value.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardTypeId;
    use crate::core::stat::{StatId, StatTemplate};

    fn definition() -> CardDefinition {
        CardDefinition::new(CardId::new(4), "Knight", CardTypeId::new(0))
            .with_stat(StatTemplate::new(StatId::new(0), "Attack", 3, 0, 99))
            .with_stat(StatTemplate::new(StatId::new(1), "Health", 6, 0, 99))
            .with_keyword(RuntimeKeyword::new(KeywordId(1), KeywordValueId(0)))
    }

    #[test]
    fn test_from_definition_copies_stats() {
        let def = definition();
        let mut a = RuntimeCard::from_definition(&def, PlayerId::new(0), InstanceId(0));
        let b = RuntimeCard::from_definition(&def, PlayerId::new(0), InstanceId(1));

        a.stats.by_name_mut("Health").unwrap().modify_base_value(-2);
        assert_eq!(a.stat("Health").unwrap().effective_value(), 4);
        assert_eq!(b.stat("Health").unwrap().effective_value(), 6);
        assert_eq!(a.card_ref(), CardRef::new(PlayerId::new(0), InstanceId(0)));
    }

    #[test]
    fn test_keywords() {
        let mut card = RuntimeCard::from_definition(&definition(), PlayerId::new(1), InstanceId(0));
        assert!(card.has_keyword(KeywordId(1)));

        let extra = RuntimeKeyword::new(KeywordId(2), KeywordValueId(5));
        card.add_keyword(extra);
        assert_eq!(card.keyword_pairs(), vec![(1, 0), (2, 5)]);

        assert!(card.remove_keyword(extra));
        assert!(!card.remove_keyword(extra));
        assert!(!card.has_keyword(KeywordId(2)));
    }
}
