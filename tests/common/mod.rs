//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use ccg_server::cards::{CardId, CardRegistry};
use ccg_server::core::{
    Applied, CardRef, ConnectionId, GameAction, GameRng, GameState, MatchConfig, NetId, PlayerId,
    Registration, StatId, ZoneId,
};
use ccg_server::effects::EffectSolver;
use ccg_server::games::starter;
use ccg_server::rules::start_game;

pub const P0: PlayerId = PlayerId(0);
pub const P1: PlayerId = PlayerId(1);

pub fn solver_with(config: MatchConfig) -> EffectSolver {
    solver_with_cards(config, starter::card_registry().unwrap())
}

pub fn solver_with_cards(config: MatchConfig, registry: CardRegistry) -> EffectSolver {
    EffectSolver::new(Arc::new(registry), Arc::new(config))
}

/// Connection `seat + 1`, net id `100 + seat`.
pub fn registration(seat: u8, deck: Vec<CardId>) -> Registration {
    Registration {
        connection: connection(seat),
        net_id: net_id(seat),
        nickname: format!("player{seat}"),
        is_human: true,
        deck,
    }
}

pub fn connection(seat: u8) -> ConnectionId {
    ConnectionId(u64::from(seat) + 1)
}

pub fn net_id(seat: u8) -> NetId {
    NetId(100 + u32::from(seat))
}

/// Build a started game with a fixed seed.
pub fn new_game(solver: &EffectSolver, decks: Vec<Vec<CardId>>) -> GameState {
    let registrations = decks
        .into_iter()
        .enumerate()
        .map(|(seat, deck)| registration(seat as u8, deck))
        .collect();
    start_game(solver, registrations, GameRng::new(7))
}

pub fn zone_id(state: &GameState, player: PlayerId, name: &str) -> ZoneId {
    state.player(player).unwrap().zones.id_of(name).unwrap()
}

pub fn zone_len(state: &GameState, player: PlayerId, name: &str) -> usize {
    state.player(player).unwrap().zones.count(name)
}

/// Create a card directly in a zone, without firing triggers.
pub fn place(
    solver: &EffectSolver,
    state: &mut GameState,
    player: PlayerId,
    card: CardId,
    zone: &str,
) -> CardRef {
    let zone = zone_id(state, player, zone);
    let action = GameAction::CreateCard {
        player,
        card_id: card,
        zone,
    };
    match solver.apply(state, player, action).unwrap() {
        Applied::Created(card) => card,
        other => panic!("unexpected result {other:?}"),
    }
}

pub fn player_stat(state: &GameState, player: PlayerId, stat: StatId) -> i64 {
    state.player(player).unwrap().stats.effective(stat).unwrap()
}

pub fn set_player_stat(
    solver: &EffectSolver,
    state: &mut GameState,
    player: PlayerId,
    stat: StatId,
    value: i64,
) {
    solver
        .apply(state, player, GameAction::SetPlayerStat { player, stat, value })
        .unwrap();
}

pub fn card_stat(state: &GameState, card: CardRef, stat: StatId) -> i64 {
    state.card(card).unwrap().stats.effective(stat).unwrap()
}

pub fn zone_of(state: &GameState, card: CardRef) -> Option<String> {
    let (zone, _) = state.locate(card)?;
    state
        .player(card.owner)?
        .zones
        .get(zone)
        .map(|z| z.name.clone())
}
