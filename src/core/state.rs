//! Canonical match state.
//!
//! ## GameState
//!
//! One `GameState` per match, owned by that match's session and mutated only
//! by the effect solver on the match's actor task:
//! - seated players (fixed at match start) with their stats and zones
//! - current player and current opponent, rotated every turn
//! - turn counter, deterministic RNG and the seed it started from
//! - append-only history of resolved actions
//! - events queued for the session to broadcast
//! - the diagnostics hook for dropped operations
//!
//! The history uses `im::Vector`, so snapshots for replay or inspection are
//! cheap clones.

use im::Vector;

use super::action::{ActionRecord, GameAction, GameEvent};
use super::config::ZoneId;
use super::diagnostics::{Diagnostics, Outcome, Rejection};
use super::entity::{CardRef, ConnectionId, NetId};
use super::player::{PlayerId, PlayerInfo, PlayerMap};
use super::rng::GameRng;
use crate::cards::RuntimeCard;

/// Full authoritative state of one match.
#[derive(Clone, Debug)]
pub struct GameState {
    players: PlayerMap<PlayerInfo>,
    current_player: PlayerId,
    current_opponent: PlayerId,
    /// Turn number (starts at 1).
    pub turn: u32,
    /// Match RNG; every shuffle draws from it.
    pub rng: GameRng,
    history: Vector<ActionRecord>,
    next_sequence: u32,
    events: Vec<GameEvent>,
    /// Reporting point for dropped operations.
    pub diagnostics: Diagnostics,
}

impl GameState {
    /// Create the state for seated players. Player 0 starts.
    ///
    /// `players[i]` must have `id == PlayerId(i)`.
    #[must_use]
    pub fn new(players: Vec<PlayerInfo>, rng: GameRng) -> Self {
        debug_assert!(players
            .iter()
            .enumerate()
            .all(|(i, p)| p.id.index() == i));

        let player_count = players.len();
        let mut state = Self {
            players: PlayerMap::from_vec(players),
            current_player: PlayerId::new(0),
            current_opponent: PlayerId::new(0).next(player_count),
            turn: 1,
            rng,
            history: Vector::new(),
            next_sequence: 0,
            events: Vec::new(),
            diagnostics: Diagnostics::new(),
        };
        state.set_current_player(PlayerId::new(0));
        state
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Seed the match RNG started from.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng.seed()
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(player)
    }

    pub fn player_mut(&mut self, player: PlayerId) -> Option<&mut PlayerInfo> {
        self.players.get_mut(player)
    }

    /// Lookup that reports a miss as a rejection.
    pub fn require_player(&self, player: PlayerId) -> Outcome<&PlayerInfo> {
        self.players.get(player).ok_or(Rejection::PlayerNotFound)
    }

    pub fn require_player_mut(&mut self, player: PlayerId) -> Outcome<&mut PlayerInfo> {
        self.players.get_mut(player).ok_or(Rejection::PlayerNotFound)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.iter().map(|(_, p)| p)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        self.players.player_ids()
    }

    #[must_use]
    pub fn player_by_connection(&self, connection: ConnectionId) -> Option<&PlayerInfo> {
        self.players().find(|p| p.connection == connection)
    }

    #[must_use]
    pub fn player_by_net_id(&self, net_id: NetId) -> Option<&PlayerInfo> {
        self.players().find(|p| p.net_id == net_id)
    }

    // === Turn order ===

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn current_opponent(&self) -> PlayerId {
        self.current_opponent
    }

    /// The player `player` attacks and measures "opponent" values against:
    /// the next seat in turn order.
    #[must_use]
    pub fn opponent_of(&self, player: PlayerId) -> PlayerId {
        player.next(self.player_count())
    }

    /// Make `player` the turn owner and update the active flags.
    pub fn set_current_player(&mut self, player: PlayerId) {
        self.current_player = player;
        self.current_opponent = self.opponent_of(player);
        for (id, info) in self.players.iter_mut() {
            info.is_active = id == player;
        }
    }

    /// Pass the turn to the next seat and bump the turn counter.
    pub fn rotate_turn(&mut self) -> PlayerId {
        let next = self.current_player.next(self.player_count());
        self.set_current_player(next);
        self.turn += 1;
        next
    }

    // === Cards ===

    /// Find a card and the zone holding it.
    #[must_use]
    pub fn locate(&self, card: CardRef) -> Option<(ZoneId, &RuntimeCard)> {
        self.players.get(card.owner)?.find_card(card.instance)
    }

    #[must_use]
    pub fn card(&self, card: CardRef) -> Option<&RuntimeCard> {
        self.locate(card).map(|(_, c)| c)
    }

    pub fn card_mut(&mut self, card: CardRef) -> Option<&mut RuntimeCard> {
        self.players.get_mut(card.owner)?.find_card_mut(card.instance)
    }

    pub fn require_card(&self, card: CardRef) -> Outcome<&RuntimeCard> {
        self.card(card).ok_or(Rejection::CardNotFound {
            owner: card.owner,
            instance: card.instance,
        })
    }

    pub fn require_card_mut(&mut self, card: CardRef) -> Outcome<&mut RuntimeCard> {
        self.card_mut(card).ok_or(Rejection::CardNotFound {
            owner: card.owner,
            instance: card.instance,
        })
    }

    /// Shuffle one of a player's zones with the match RNG.
    pub fn shuffle_zone(&mut self, player: PlayerId, zone: ZoneId) -> Outcome<()> {
        let info = self.players.get_mut(player).ok_or(Rejection::PlayerNotFound)?;
        let zone = info.zones.get_mut(zone).ok_or_else(|| Rejection::ZoneNotFound {
            zone: zone.to_string(),
        })?;
        zone.shuffle(&mut self.rng);
        Ok(())
    }

    // === History ===

    /// Append a resolved action.
    pub fn record(&mut self, player: PlayerId, action: GameAction) {
        let record = ActionRecord::new(player, action, self.turn, self.next_sequence);
        self.next_sequence += 1;
        self.history.push_back(record);
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Events ===

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::{MatchConfig, Registration, StatId};

    fn state(player_count: usize) -> GameState {
        let config = MatchConfig::new(player_count);
        let players = PlayerId::all(player_count)
            .map(|id| {
                let registration = Registration {
                    connection: ConnectionId(id.0 as u64 + 1),
                    net_id: NetId(id.0 as u32 + 10),
                    nickname: format!("p{}", id.0),
                    is_human: true,
                    deck: vec![CardId::new(1)],
                };
                PlayerInfo::new(id, registration, &config)
            })
            .collect();
        GameState::new(players, GameRng::new(42))
    }

    #[test]
    fn test_new_state() {
        let state = state(2);

        assert_eq!(state.player_count(), 2);
        assert_eq!(state.turn, 1);
        assert_eq!(state.current_player(), PlayerId::new(0));
        assert_eq!(state.current_opponent(), PlayerId::new(1));
        assert!(state.player(PlayerId::new(0)).unwrap().is_active);
        assert!(!state.player(PlayerId::new(1)).unwrap().is_active);
        assert_eq!(state.rng_seed(), 42);
    }

    #[test]
    fn test_rotation_two_players() {
        let mut state = state(2);
        for n in 1..=5u32 {
            state.rotate_turn();
            assert_eq!(state.current_player().index(), (n % 2) as usize);
            assert_eq!(state.turn, n + 1);
        }
    }

    #[test]
    fn test_rotation_four_players() {
        let mut state = state(4);
        state.rotate_turn();
        state.rotate_turn();
        state.rotate_turn();
        assert_eq!(state.current_player(), PlayerId::new(3));
        assert_eq!(state.current_opponent(), PlayerId::new(0));
        assert_eq!(
            state.players().filter(|p| p.is_active).count(),
            1
        );
    }

    #[test]
    fn test_lookup_by_connection() {
        let state = state(2);
        assert_eq!(
            state.player_by_connection(ConnectionId(2)).map(|p| p.id),
            Some(PlayerId::new(1))
        );
        assert!(state.player_by_connection(ConnectionId(99)).is_none());
        assert_eq!(
            state.player_by_net_id(NetId(10)).map(|p| p.id),
            Some(PlayerId::new(0))
        );
    }

    #[test]
    fn test_require_missing() {
        let state = state(2);
        assert_eq!(
            state.require_player(PlayerId::new(5)).err(),
            Some(Rejection::PlayerNotFound)
        );
        let missing = CardRef::new(PlayerId::new(0), crate::core::InstanceId(77));
        assert!(matches!(
            state.require_card(missing),
            Err(Rejection::CardNotFound { .. })
        ));
    }

    #[test]
    fn test_history_sequence() {
        let mut state = state(2);
        let action = GameAction::ModifyPlayerStat {
            player: PlayerId::new(0),
            stat: StatId::new(0),
            delta: -1,
        };
        state.record(PlayerId::new(0), action.clone());
        state.rotate_turn();
        state.record(PlayerId::new(1), action);

        let history = state.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sequence, 0);
        assert_eq!(history[1].sequence, 1);
        assert_eq!(history[1].turn, 2);
    }

    #[test]
    fn test_drain_events() {
        let mut state = state(2);
        state.push_event(GameEvent::CardsDrawn {
            player: PlayerId::new(0),
            instances: Vec::new(),
        });
        assert_eq!(state.pending_events().len(), 1);
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.pending_events().is_empty());
    }
}
