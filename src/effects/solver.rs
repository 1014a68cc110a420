//! The effect solver: the only code that mutates a `GameState`.
//!
//! ## Layers
//!
//! - [`EffectSolver::apply`] applies one [`GameAction`] and appends it to the
//!   history. Every mutation in a match goes through it.
//! - Effect resolution expands declared [`Effect`]s into actions, evaluating
//!   `Value`s in the source's context and resolving targets.
//! - Operations (`draw_cards`, `move_card`, `play_card`, `activate_ability`,
//!   `fight_player`, `fight_creature`, `start_turn`, `end_turn`) are what the
//!   session calls in response to client messages and turn changes.
//!
//! ## Failure
//!
//! Operations return [`Outcome`]; lookups happen before the first mutation,
//! so a rejected operation leaves the state untouched. Failures inside
//! triggered effects don't abort the trigger chain: each one is reported to
//! the diagnostics hook and resolution continues with the next effect.
//! Nested triggers deeper than [`MAX_TRIGGER_DEPTH`] are cut off.

use std::sync::Arc;

use tracing::{debug, trace};

use super::cost::{pay_costs_then, Cost};
use super::effect::{CardEffect, Effect, PlayerEffect, Trigger};
use crate::cards::{CardRegistry, RuntimeCard};
use crate::core::{
    Applied, CardRef, GameAction, GameEvent, GameState, InstanceId, MatchConfig, Modifier,
    Outcome, PlayerId, Rejection, Stat, StatId, ZoneId,
};
use crate::values::ValueContext;
use crate::zones::ZonePosition;

/// Maximum nesting of triggered effects.
pub const MAX_TRIGGER_DEPTH: usize = 32;

fn zone_missing(zone: impl std::fmt::Display) -> Rejection {
    Rejection::ZoneNotFound {
        zone: zone.to_string(),
    }
}

fn card_missing(card: CardRef) -> Rejection {
    Rejection::CardNotFound {
        owner: card.owner,
        instance: card.instance,
    }
}

fn non_negative(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

fn player_stat_mut(state: &mut GameState, player: PlayerId, stat: StatId) -> Outcome<&mut Stat> {
    state
        .require_player_mut(player)?
        .stats
        .get_mut(stat)
        .ok_or(Rejection::StatNotFound { stat })
}

fn card_stat_mut(state: &mut GameState, card: CardRef, stat: StatId) -> Outcome<&mut Stat> {
    state
        .require_card_mut(card)?
        .stats
        .get_mut(stat)
        .ok_or(Rejection::StatNotFound { stat })
}

/// `(id, effective value)` of a card stat looked up by name.
fn card_stat_named(state: &GameState, card: CardRef, name: &str) -> Outcome<(StatId, i64)> {
    let stat = state
        .require_card(card)?
        .stat(name)
        .ok_or_else(|| Rejection::StatNameNotFound { name: name.into() })?;
    Ok((stat.id, stat.effective_value()))
}

fn zone_id(state: &GameState, player: PlayerId, name: &str) -> Outcome<ZoneId> {
    state
        .require_player(player)?
        .zones
        .id_of(name)
        .ok_or_else(|| zone_missing(name))
}

/// Rules interpreter for one server.
///
/// Holds only read-only data (card registry, match config), so one solver
/// can be shared by every match using the same config.
#[derive(Clone, Debug)]
pub struct EffectSolver {
    registry: Arc<CardRegistry>,
    config: Arc<MatchConfig>,
}

impl EffectSolver {
    pub fn new(registry: Arc<CardRegistry>, config: Arc<MatchConfig>) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    // === Actions ===

    /// Apply one action on behalf of `actor` and record it.
    pub fn apply(&self, state: &mut GameState, actor: PlayerId, action: GameAction) -> Outcome<Applied> {
        let applied = self.apply_action(state, &action)?;
        debug!(action = action.name(), player = %actor, turn = state.turn, "action resolved");
        state.record(actor, action);
        Ok(applied)
    }

    fn apply_action(&self, state: &mut GameState, action: &GameAction) -> Outcome<Applied> {
        match *action {
            GameAction::ModifyPlayerStat { player, stat, delta } => {
                player_stat_mut(state, player, stat)?.modify_base_value(delta);
            }
            GameAction::SetPlayerStat { player, stat, value } => {
                player_stat_mut(state, player, stat)?.set_base_value(value);
            }
            GameAction::ModifyCardStat { card, stat, delta } => {
                card_stat_mut(state, card, stat)?.modify_base_value(delta);
            }
            GameAction::SetCardStat { card, stat, value } => {
                card_stat_mut(state, card, stat)?.set_base_value(value);
            }
            GameAction::AddCardModifier { card, stat, modifier } => {
                card_stat_mut(state, card, stat)?.add_modifier(modifier);
            }
            GameAction::DrawCards { player, count } => {
                let names = &self.config.zone_names;
                let info = state.require_player_mut(player)?;
                let hand_id = info.zones.id_of(&names.hand).ok_or_else(|| zone_missing(&names.hand))?;
                let room = info.zones.get(hand_id).map_or(0, |z| z.remaining_capacity());
                let library = info
                    .zones
                    .by_name_mut(&names.library)
                    .ok_or_else(|| zone_missing(&names.library))?;

                let drawn = library.take_top(count.min(room));
                let instances: Vec<InstanceId> = drawn.iter().map(|c| c.instance_id).collect();
                let hand = info.zones.get_mut(hand_id).ok_or_else(|| zone_missing(hand_id))?;
                for card in drawn {
                    hand.insert(card, ZonePosition::Bottom);
                }

                state.push_event(GameEvent::CardsDrawn {
                    player,
                    instances: instances.clone(),
                });
                return Ok(Applied::Drawn(instances));
            }
            GameAction::MoveCard {
                card,
                from,
                to,
                position,
            } => {
                let info = state.require_player_mut(card.owner)?;
                let destination = info.zones.get(to).ok_or_else(|| zone_missing(to))?;
                if from != to && destination.is_full() {
                    return Err(Rejection::ZoneFull {
                        zone: destination.name.clone(),
                    });
                }
                let moved = info
                    .zones
                    .get_mut(from)
                    .ok_or_else(|| zone_missing(from))?
                    .remove(card.instance)
                    .ok_or_else(|| card_missing(card))?;
                info.zones
                    .get_mut(to)
                    .ok_or_else(|| zone_missing(to))?
                    .insert(moved, position);

                state.push_event(GameEvent::CardMoved { card, from, to });
            }
            GameAction::CreateCard {
                player,
                card_id,
                zone,
            } => {
                let definition = self
                    .registry
                    .get(card_id)
                    .ok_or(Rejection::DefinitionNotFound { card: card_id })?;
                let info = state.require_player_mut(player)?;
                let target = info.zones.get(zone).ok_or_else(|| zone_missing(zone))?;
                if target.is_full() {
                    return Err(Rejection::ZoneFull {
                        zone: target.name.clone(),
                    });
                }

                let instance = info.alloc_instance_id();
                let runtime = RuntimeCard::from_definition(definition, player, instance);
                info.zones
                    .get_mut(zone)
                    .ok_or_else(|| zone_missing(zone))?
                    .insert(runtime, ZonePosition::Bottom);

                let card = CardRef::new(player, instance);
                state.push_event(GameEvent::CardCreated { card, zone });
                return Ok(Applied::Created(card));
            }
            GameAction::AddKeyword { card, keyword } => {
                state.require_card_mut(card)?.add_keyword(keyword);
            }
            GameAction::RemoveKeyword { card, keyword } => {
                state.require_card_mut(card)?.remove_keyword(keyword);
            }
            GameAction::ShuffleZone { player, zone } => {
                state.shuffle_zone(player, zone)?;
            }
        }
        Ok(Applied::Done)
    }

    // === Effects ===

    /// Resolve every effect `card` declares for `trigger`, in order.
    pub fn resolve_card_effects(
        &self,
        state: &mut GameState,
        card: CardRef,
        trigger: &Trigger,
        info: &[i32],
    ) {
        self.fire(state, card, trigger, info, 0);
    }

    fn fire(&self, state: &mut GameState, card: CardRef, trigger: &Trigger, info: &[i32], depth: usize) {
        if depth > MAX_TRIGGER_DEPTH {
            state.diagnostics.report(Rejection::RecursionLimit { depth });
            return;
        }
        let Some(card_id) = state.card(card).map(|c| c.card_id) else {
            state.diagnostics.report(card_missing(card));
            return;
        };
        let Some(definition) = self.registry.get(card_id) else {
            state
                .diagnostics
                .report(Rejection::DefinitionNotFound { card: card_id });
            return;
        };

        let ctx = ValueContext::card(card);
        for triggered in definition.ordered_effects(trigger) {
            if let Some(condition) = &triggered.condition {
                if !condition.evaluate(state, &ctx) {
                    trace!(card = %card, effect = triggered.effect.name(), "condition not met");
                    continue;
                }
            }
            self.resolve_effect_at(state, &triggered.effect, &ctx, info, depth);
        }
    }

    /// Resolve a single effect in the given context.
    pub fn resolve_effect(&self, state: &mut GameState, effect: &Effect, ctx: &ValueContext, info: &[i32]) {
        self.resolve_effect_at(state, effect, ctx, info, 0);
    }

    fn resolve_effect_at(
        &self,
        state: &mut GameState,
        effect: &Effect,
        ctx: &ValueContext,
        info: &[i32],
        depth: usize,
    ) {
        match effect {
            Effect::Player { target, effect } => {
                for player in target.resolve(state, ctx, info) {
                    let outcome = self.resolve_player_effect(state, effect, ctx, player, depth);
                    state.diagnostics.check(outcome);
                }
            }
            Effect::Card { target, effect } => {
                for card in target.resolve(state, ctx, info) {
                    let outcome = self.resolve_card_effect(state, effect, ctx, card, depth);
                    state.diagnostics.check(outcome);
                }
            }
        }
    }

    fn resolve_player_effect(
        &self,
        state: &mut GameState,
        effect: &PlayerEffect,
        ctx: &ValueContext,
        target: PlayerId,
        depth: usize,
    ) -> Outcome<()> {
        let actor = ctx.player;
        match effect {
            PlayerEffect::DrawCards { count } => {
                let count = non_negative(count.evaluate(state, ctx));
                self.apply(state, actor, GameAction::DrawCards { player: target, count })?;
            }
            PlayerEffect::IncreaseStat { stat, value } => {
                let delta = value.evaluate(state, ctx);
                self.apply(
                    state,
                    actor,
                    GameAction::ModifyPlayerStat {
                        player: target,
                        stat: *stat,
                        delta,
                    },
                )?;
            }
            PlayerEffect::DecreaseStat { stat, value } => {
                let delta = value.evaluate(state, ctx).saturating_neg();
                self.apply(
                    state,
                    actor,
                    GameAction::ModifyPlayerStat {
                        player: target,
                        stat: *stat,
                        delta,
                    },
                )?;
            }
            PlayerEffect::SetStat { stat, value } => {
                let value = value.evaluate(state, ctx);
                self.apply(
                    state,
                    actor,
                    GameAction::SetPlayerStat {
                        player: target,
                        stat: *stat,
                        value,
                    },
                )?;
            }
            PlayerEffect::CreateCard { card, copies, zone } => {
                let card_id = self
                    .registry
                    .by_name(card)
                    .map(|d| d.id)
                    .ok_or_else(|| Rejection::DefinitionNameNotFound { name: card.clone() })?;
                let zone_id = zone_id(state, target, zone)?;
                let copies = non_negative(copies.evaluate(state, ctx));
                let entered = Trigger::EnterZone(zone.clone());

                for _ in 0..copies {
                    let action = GameAction::CreateCard {
                        player: target,
                        card_id,
                        zone: zone_id,
                    };
                    if let Applied::Created(created) = self.apply(state, actor, action)? {
                        self.fire(state, created, &entered, &[], depth + 1);
                    }
                }
            }
            PlayerEffect::MoveTopCards { count, from, to } => {
                let from_id = zone_id(state, target, from)?;
                let to_id = zone_id(state, target, to)?;
                let count = non_negative(count.evaluate(state, ctx));
                let instances: Vec<InstanceId> = state
                    .require_player(target)?
                    .zones
                    .get(from_id)
                    .map(|z| z.cards().iter().take(count).map(|c| c.instance_id).collect())
                    .unwrap_or_default();

                for instance in instances {
                    let card = CardRef::new(target, instance);
                    self.move_card_at(state, actor, card, from_id, to_id, &[], depth + 1)?;
                }
            }
            PlayerEffect::ShuffleZone { zone } => {
                let zone = zone_id(state, target, zone)?;
                self.apply(state, actor, GameAction::ShuffleZone { player: target, zone })?;
            }
        }
        Ok(())
    }

    fn resolve_card_effect(
        &self,
        state: &mut GameState,
        effect: &CardEffect,
        ctx: &ValueContext,
        card: CardRef,
        depth: usize,
    ) -> Outcome<()> {
        let actor = ctx.player;
        let action = match effect {
            CardEffect::IncreaseStat { stat, value } => GameAction::ModifyCardStat {
                card,
                stat: *stat,
                delta: value.evaluate(state, ctx),
            },
            CardEffect::DecreaseStat { stat, value } => GameAction::ModifyCardStat {
                card,
                stat: *stat,
                delta: value.evaluate(state, ctx).saturating_neg(),
            },
            CardEffect::SetStat { stat, value } => GameAction::SetCardStat {
                card,
                stat: *stat,
                value: value.evaluate(state, ctx),
            },
            CardEffect::AddModifier {
                stat,
                value,
                duration,
            } => GameAction::AddCardModifier {
                card,
                stat: *stat,
                modifier: Modifier {
                    value: value.evaluate(state, ctx),
                    duration: *duration,
                },
            },
            CardEffect::AddKeyword(keyword) => GameAction::AddKeyword {
                card,
                keyword: *keyword,
            },
            CardEffect::RemoveKeyword(keyword) => GameAction::RemoveKeyword {
                card,
                keyword: *keyword,
            },
            CardEffect::MoveToZone { zone } => {
                let (from, _) = state.locate(card).ok_or_else(|| card_missing(card))?;
                let to = zone_id(state, card.owner, zone)?;
                return self.move_card_at(state, actor, card, from, to, &[], depth + 1);
            }
        };
        self.apply(state, actor, action)?;
        Ok(())
    }

    // === Operations ===

    /// Draw up to `count` cards for `player`; returns the drawn instances.
    ///
    /// Draws fewer when the library runs out or the hand fills up.
    pub fn draw_cards(&self, state: &mut GameState, player: PlayerId, count: usize) -> Outcome<Vec<InstanceId>> {
        match self.apply(state, player, GameAction::DrawCards { player, count })? {
            Applied::Drawn(instances) => Ok(instances),
            _ => Ok(Vec::new()),
        }
    }

    /// Move a card between two of `player`'s zones, then fire its
    /// leave-zone and enter-zone effects.
    pub fn move_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        instance: InstanceId,
        origin: ZoneId,
        destination: ZoneId,
        info: &[i32],
    ) -> Outcome<()> {
        let card = CardRef::new(player, instance);
        self.move_card_at(state, player, card, origin, destination, info, 0)
    }

    #[allow(clippy::too_many_arguments)]
    fn move_card_at(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        card: CardRef,
        from: ZoneId,
        to: ZoneId,
        info: &[i32],
        depth: usize,
    ) -> Outcome<()> {
        let owner = state.require_player(card.owner)?;
        let from_name = owner.zones.get(from).ok_or_else(|| zone_missing(from))?.name.clone();
        let to_name = owner.zones.get(to).ok_or_else(|| zone_missing(to))?.name.clone();

        self.apply(
            state,
            actor,
            GameAction::MoveCard {
                card,
                from,
                to,
                position: ZonePosition::Bottom,
            },
        )?;
        self.fire(state, card, &Trigger::LeaveZone(from_name), info, depth + 1);
        self.fire(state, card, &Trigger::EnterZone(to_name), info, depth + 1);
        Ok(())
    }

    /// Handle a client `MoveCard`: pay the card's costs when it leaves the
    /// hand, then move it.
    pub fn play_card(
        &self,
        state: &mut GameState,
        player: PlayerId,
        instance: InstanceId,
        origin: ZoneId,
        destination: ZoneId,
        info: &[i32],
    ) -> Outcome<()> {
        let card = CardRef::new(player, instance);
        let (location, runtime) = state.locate(card).ok_or_else(|| card_missing(card))?;
        if location != origin {
            return Err(card_missing(card));
        }
        let card_id = runtime.card_id;
        let definition = self
            .registry
            .get(card_id)
            .ok_or(Rejection::DefinitionNotFound { card: card_id })?;

        let owner = state.require_player(player)?;
        let target = owner.zones.get(destination).ok_or_else(|| zone_missing(destination))?;
        if origin != destination && target.is_full() {
            return Err(Rejection::ZoneFull {
                zone: target.name.clone(),
            });
        }
        let from_hand = owner.zones.id_of(&self.config.zone_names.hand) == Some(origin);
        let costs: &[Cost] = if from_hand { &definition.costs } else { &[] };

        pay_costs_then(state, &ValueContext::card(card), costs, |state| {
            self.move_card(state, player, instance, origin, destination, info)
        })?
    }

    /// Pay an ability's costs and resolve its effects.
    #[allow(clippy::too_many_arguments)]
    pub fn activate_ability(
        &self,
        state: &mut GameState,
        player: PlayerId,
        zone: ZoneId,
        instance: InstanceId,
        ability_index: usize,
        info: &[i32],
    ) -> Outcome<()> {
        let card = CardRef::new(player, instance);
        let (location, runtime) = state.locate(card).ok_or_else(|| card_missing(card))?;
        if location != zone {
            return Err(card_missing(card));
        }
        let card_id = runtime.card_id;
        let definition = self
            .registry
            .get(card_id)
            .ok_or(Rejection::DefinitionNotFound { card: card_id })?;
        let ability = definition
            .abilities
            .get(ability_index)
            .ok_or(Rejection::AbilityNotFound {
                card,
                index: ability_index,
            })?;

        let ctx = ValueContext::card(card);
        pay_costs_then(state, &ctx, &ability.costs, |state| {
            debug!(card = %card, ability = %ability.name, "ability activated");
            for effect in &ability.effects {
                self.resolve_effect_at(state, effect, &ctx, info, 0);
            }
        })
    }

    fn require_on_board(&self, state: &GameState, card: CardRef) -> Outcome<()> {
        let board = zone_id(state, card.owner, &self.config.zone_names.board)?;
        match state.locate(card) {
            Some((zone, _)) if zone == board => Ok(()),
            _ => Err(card_missing(card)),
        }
    }

    /// A creature attacks the owner's opponent directly.
    ///
    /// Returns the damaged player. The attacker takes no damage.
    pub fn fight_player(&self, state: &mut GameState, attacker: CardRef) -> Outcome<PlayerId> {
        let combat = &self.config.combat;
        self.require_on_board(state, attacker)?;
        let (_, attack) = card_stat_named(state, attacker, &combat.attack_stat)?;

        let target = state.opponent_of(attacker.owner);
        let health = state
            .require_player(target)?
            .stats
            .id_of(&combat.player_health_stat)
            .ok_or_else(|| Rejection::StatNameNotFound {
                name: combat.player_health_stat.clone(),
            })?;

        self.apply(
            state,
            attacker.owner,
            GameAction::ModifyPlayerStat {
                player: target,
                stat: health,
                delta: -attack,
            },
        )?;
        Ok(target)
    }

    /// Two creatures deal their attack to each other's health. Creatures
    /// left at 0 health or less go to the graveyard.
    ///
    /// The attacked creature must belong to the attacker's opponent.
    pub fn fight_creature(&self, state: &mut GameState, attacker: CardRef, attacked: CardRef) -> Outcome<()> {
        let combat = &self.config.combat;
        if attacked == attacker || attacked.owner != state.opponent_of(attacker.owner) {
            return Err(Rejection::IllegalTarget {
                card: attacker,
                target: attacked,
            });
        }
        self.require_on_board(state, attacker)?;
        self.require_on_board(state, attacked)?;

        let (_, attacker_attack) = card_stat_named(state, attacker, &combat.attack_stat)?;
        let (attacker_health, _) = card_stat_named(state, attacker, &combat.health_stat)?;
        let (_, attacked_attack) = card_stat_named(state, attacked, &combat.attack_stat)?;
        let (attacked_health, _) = card_stat_named(state, attacked, &combat.health_stat)?;

        self.apply(
            state,
            attacker.owner,
            GameAction::ModifyCardStat {
                card: attacked,
                stat: attacked_health,
                delta: -attacker_attack,
            },
        )?;
        self.apply(
            state,
            attacker.owner,
            GameAction::ModifyCardStat {
                card: attacker,
                stat: attacker_health,
                delta: -attacked_attack,
            },
        )?;

        self.destroy_dead(state);
        Ok(())
    }

    /// Move every board creature at 0 health or less to its owner's
    /// graveyard. Returns the destroyed cards.
    pub fn destroy_dead(&self, state: &mut GameState) -> Vec<CardRef> {
        let names = &self.config.zone_names;
        let health = &self.config.combat.health_stat;
        let mut destroyed = Vec::new();

        // Death triggers can kill more creatures; bounded like any trigger chain.
        for _ in 0..=MAX_TRIGGER_DEPTH {
            let mut dead = Vec::new();
            for player in state.players() {
                let (Some(board), Some(graveyard)) =
                    (player.zones.id_of(&names.board), player.zones.id_of(&names.graveyard))
                else {
                    continue;
                };
                let Some(zone) = player.zones.get(board) else {
                    continue;
                };
                for card in zone.cards() {
                    if card.stat(health).is_some_and(|s| s.effective_value() <= 0) {
                        dead.push((card.card_ref(), board, graveyard));
                    }
                }
            }
            if dead.is_empty() {
                break;
            }

            for (card, board, graveyard) in dead {
                debug!(card = %card, "creature destroyed");
                let outcome = self.move_card_at(state, card.owner, card, board, graveyard, &[], 0);
                if state.diagnostics.check(outcome).is_some() {
                    destroyed.push(card);
                } else {
                    return destroyed;
                }
            }
        }
        destroyed
    }

    fn board_cards(&self, state: &GameState, player: PlayerId) -> Vec<CardRef> {
        state
            .player(player)
            .and_then(|p| p.zones.by_name(&self.config.zone_names.board))
            .map(|z| z.cards().iter().map(|c| c.card_ref()).collect())
            .unwrap_or_default()
    }

    /// Start-of-turn processing for the current player: configured turn
    /// start effects, then `TurnStarted` triggers on their board.
    pub fn start_turn(&self, state: &mut GameState) {
        let player = state.current_player();
        let ctx = ValueContext::player(player);
        for effect in &self.config.turn_start_effects {
            let outcome = self.resolve_player_effect(state, effect, &ctx, player, 0);
            state.diagnostics.check(outcome);
        }
        for card in self.board_cards(state, player) {
            self.fire(state, card, &Trigger::TurnStarted, &[], 0);
        }
    }

    /// End-of-turn processing for the current player: `TurnEnded` triggers
    /// on their board, then one tick off every timed modifier they own.
    pub fn end_turn(&self, state: &mut GameState) {
        let player = state.current_player();
        for card in self.board_cards(state, player) {
            self.fire(state, card, &Trigger::TurnEnded, &[], 0);
        }

        if let Some(info) = state.player_mut(player) {
            let mut expired = info.stats.tick_modifiers();
            for zone in info.zones.iter_mut() {
                for card in zone.iter_mut() {
                    expired += card.stats.tick_modifiers();
                }
            }
            trace!(player = %player, expired, "modifiers ticked");
        }
    }
}
