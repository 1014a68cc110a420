//! Starter card set.
//!
//! A small set of creatures and spells exercising every effect family:
//! enter/leave-zone triggers, turn-start triggers, conditional effects,
//! token creation and activated abilities. The server binary uses it when no
//! card database is given, and the tests use it as fixture data.
//!
//! Card stats use [`ATTACK`] and [`HEALTH`]; costs are paid from the default
//! player stat [`MANA`].

use crate::cards::{CardDefinition, CardId, CardRegistry, CardTypeId, KeywordId, KeywordValueId, RuntimeKeyword};
use crate::core::{Result, StatId, StatTemplate};
use crate::effects::{
    ActivatedAbility, CardEffect, CardTarget, Cost, Effect, PlayerEffect, PlayerTarget, Side, Trigger,
    TriggeredEffect,
};
use crate::values::{Comparison, Condition, Value};

/// Player stats (match the default `MatchConfig`).
pub const LIFE: StatId = StatId::new(0);
pub const MANA: StatId = StatId::new(1);

/// Card stats.
pub const ATTACK: StatId = StatId::new(0);
pub const HEALTH: StatId = StatId::new(1);

pub const CREATURE: CardTypeId = CardTypeId::new(0);
pub const SPELL: CardTypeId = CardTypeId::new(1);

pub const IMPETUS: KeywordId = KeywordId(0);
pub const GUARD: KeywordId = KeywordId(1);

pub const FIRE_IMP: CardId = CardId::new(1);
pub const KNIGHT: CardId = CardId::new(2);
pub const OGRE: CardId = CardId::new(3);
pub const SCHOLAR: CardId = CardId::new(4);
pub const WARLORD: CardId = CardId::new(5);
pub const SQUIRE: CardId = CardId::new(6);
pub const SHAMAN: CardId = CardId::new(7);
pub const BERSERKER: CardId = CardId::new(8);
pub const NECROMANCER: CardId = CardId::new(9);
pub const FIREBALL: CardId = CardId::new(10);
pub const RALLY: CardId = CardId::new(11);

fn creature(id: CardId, name: &str, attack: i64, health: i64, mana: i64) -> CardDefinition {
    let card = CardDefinition::new(id, name, CREATURE)
        .with_stat(StatTemplate::new(ATTACK, "Attack", attack, 0, 99))
        .with_stat(StatTemplate::new(HEALTH, "Health", health, -99, 99));
    if mana > 0 {
        card.with_cost(Cost::pay_stat(MANA, mana))
    } else {
        card
    }
}

fn keyword(id: KeywordId) -> RuntimeKeyword {
    RuntimeKeyword::new(id, KeywordValueId::default())
}

fn on_board() -> Trigger {
    Trigger::EnterZone("Board".into())
}

/// Every card in the set.
#[must_use]
pub fn definitions() -> Vec<CardDefinition> {
    vec![
        creature(FIRE_IMP, "Fire Imp", 2, 1, 1).with_keyword(keyword(IMPETUS)),
        creature(KNIGHT, "Knight", 3, 6, 3).with_keyword(keyword(GUARD)),
        creature(OGRE, "Ogre", 2, 5, 2),
        creature(SCHOLAR, "Scholar", 1, 2, 2).with_effect(TriggeredEffect::new(
            on_board(),
            Effect::on_controller(PlayerEffect::DrawCards {
                count: Value::Constant(1),
            }),
        )),
        creature(WARLORD, "Warlord", 2, 3, 4).with_effect(TriggeredEffect::new(
            on_board(),
            Effect::on_controller(PlayerEffect::CreateCard {
                card: "Squire".into(),
                copies: Value::Constant(2),
                zone: "Board".into(),
            }),
        )),
        creature(SQUIRE, "Squire", 1, 1, 0),
        creature(SHAMAN, "Shaman", 1, 3, 2)
            .with_ability(
                ActivatedAbility::new("Mend")
                    .with_cost(Cost::pay_stat(MANA, 2))
                    .with_effect(Effect::on_this_card(CardEffect::IncreaseStat {
                        stat: HEALTH,
                        value: Value::Constant(2),
                    })),
            )
            .with_ability(
                ActivatedAbility::new("Spark")
                    .with_cost(Cost::pay_stat(MANA, 1))
                    .with_effect(Effect::Player {
                        target: PlayerTarget::CurrentOpponent,
                        effect: PlayerEffect::DecreaseStat {
                            stat: LIFE,
                            value: Value::Constant(1),
                        },
                    }),
            ),
        creature(BERSERKER, "Berserker", 2, 4, 3).with_effect(TriggeredEffect::new(
            Trigger::TurnStarted,
            Effect::on_this_card(CardEffect::AddModifier {
                stat: ATTACK,
                value: Value::Constant(2),
                duration: Some(1),
            }),
        )),
        // Leaving the board: draw first, then heal.
        creature(NECROMANCER, "Necromancer", 1, 2, 3)
            .with_effect(
                TriggeredEffect::new(
                    Trigger::LeaveZone("Board".into()),
                    Effect::on_controller(PlayerEffect::IncreaseStat {
                        stat: LIFE,
                        value: Value::Constant(2),
                    }),
                )
                .with_order(1),
            )
            .with_effect(TriggeredEffect::new(
                Trigger::LeaveZone("Board".into()),
                Effect::on_controller(PlayerEffect::DrawCards {
                    count: Value::Constant(1),
                }),
            )),
        CardDefinition::new(FIREBALL, "Fireball", SPELL)
            .with_cost(Cost::pay_stat(MANA, 3))
            .with_effect(
                TriggeredEffect::new(
                    Trigger::EnterZone("Graveyard".into()),
                    Effect::Player {
                        target: PlayerTarget::CurrentOpponent,
                        effect: PlayerEffect::DecreaseStat {
                            stat: LIFE,
                            value: Value::Constant(3),
                        },
                    },
                )
                .with_condition(Condition::IsActivePlayer),
            ),
        // +1 attack this turn to each of your creatures, if you have at least two.
        CardDefinition::new(RALLY, "Rally", SPELL)
            .with_cost(Cost::pay_stat(MANA, 2))
            .with_effect(
                TriggeredEffect::new(
                    Trigger::EnterZone("Graveyard".into()),
                    Effect::Card {
                        target: CardTarget::AllInZone {
                            side: Side::Controller,
                            zone: "Board".into(),
                            filter: None,
                        },
                        effect: CardEffect::AddModifier {
                            stat: ATTACK,
                            value: Value::Constant(1),
                            duration: Some(1),
                        },
                    },
                )
                .with_condition(Condition::compare(
                    Value::ZoneCount("Board".into()),
                    Comparison::GreaterOrEqual,
                    2i64,
                )),
            ),
    ]
}

/// Registry holding the whole set.
pub fn card_registry() -> Result<CardRegistry> {
    let mut registry = CardRegistry::new();
    for card in definitions() {
        registry.register(card)?;
    }
    Ok(registry)
}

/// A 20-card deck using the set.
#[must_use]
pub fn starter_deck() -> Vec<CardId> {
    [
        (FIRE_IMP, 3),
        (KNIGHT, 2),
        (OGRE, 3),
        (SCHOLAR, 2),
        (WARLORD, 1),
        (SHAMAN, 2),
        (BERSERKER, 2),
        (NECROMANCER, 1),
        (FIREBALL, 2),
        (RALLY, 2),
    ]
    .into_iter()
    .flat_map(|(card, copies)| std::iter::repeat(card).take(copies))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds() {
        let registry = card_registry().unwrap();
        assert_eq!(registry.len(), definitions().len());
        assert_eq!(registry.by_name("Squire").map(|c| c.id), Some(SQUIRE));
    }

    #[test]
    fn test_starter_deck() {
        let registry = card_registry().unwrap();
        let deck = starter_deck();
        assert_eq!(deck.len(), 20);
        assert!(deck.iter().all(|id| registry.contains(*id)));
    }

    #[test]
    fn test_set_survives_json() {
        let json = serde_json::to_string(&definitions()).unwrap();
        let registry = CardRegistry::from_json(&json).unwrap();
        assert_eq!(registry.get(KNIGHT).map(|c| c.name.as_str()), Some("Knight"));
    }
}
