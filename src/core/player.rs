//! Players: identifiers, per-player storage and runtime player info.
//!
//! ## PlayerId
//!
//! Seat index in the match, 0-based, fixed at match start.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access by `PlayerId`.
//!
//! ## PlayerInfo
//!
//! Everything the server knows about one seated player: identity, stats,
//! zones and the instance-id counter for cards created on their behalf.

use serde::{Deserialize, Serialize};

use super::config::{MatchConfig, ZoneId};
use super::entity::{ConnectionId, InstanceId, NetId};
use super::stat::StatBlock;
use crate::cards::{CardId, RuntimeCard};
use crate::zones::{Zone, ZoneSet};

/// Player seat index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a match with `player_count` players.
    ///
    /// ```
    /// use ccg_server::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The next seat in turn order.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count.max(1)) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Wrap an already-built list; entry `i` belongs to `PlayerId(i)`.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a player's entry, if the seat exists.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

/// What a client supplied when it registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub connection: ConnectionId,
    pub net_id: NetId,
    pub nickname: String,
    pub is_human: bool,
    pub deck: Vec<CardId>,
}

/// Runtime state of one seated player.
#[derive(Clone, Debug)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub net_id: NetId,
    pub connection: ConnectionId,
    pub nickname: String,
    pub is_human: bool,
    /// Deck list as registered; instantiated into the library at game start.
    pub deck: Vec<CardId>,
    pub stats: StatBlock,
    pub zones: ZoneSet,
    /// Is this player the current turn owner?
    pub is_active: bool,
    next_instance_id: u32,
}

impl PlayerInfo {
    /// Seat a registered player, building stats and zones from the config.
    pub fn new(id: PlayerId, registration: Registration, config: &MatchConfig) -> Self {
        let mut zones = ZoneSet::new();
        for zone in &config.zones {
            zones.insert(Zone::from_config(zone, id));
        }

        Self {
            id,
            net_id: registration.net_id,
            connection: registration.connection,
            nickname: registration.nickname,
            is_human: registration.is_human,
            deck: registration.deck,
            stats: StatBlock::from_templates(&config.player_stats),
            zones,
            is_active: false,
            next_instance_id: 0,
        }
    }

    /// Allocate the next card instance ID. Never decremented.
    pub fn alloc_instance_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance_id);
        self.next_instance_id += 1;
        id
    }

    /// The ID the next allocation will return.
    #[must_use]
    pub fn peek_instance_id(&self) -> InstanceId {
        InstanceId(self.next_instance_id)
    }

    /// Find a card in any of this player's zones.
    #[must_use]
    pub fn find_card(&self, instance: InstanceId) -> Option<(ZoneId, &RuntimeCard)> {
        self.zones.find_card(instance)
    }

    pub fn find_card_mut(&mut self, instance: InstanceId) -> Option<&mut RuntimeCard> {
        self.zones.find_card_mut(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(connection: u64) -> Registration {
        Registration {
            connection: ConnectionId(connection),
            net_id: NetId(connection as u32 + 100),
            nickname: format!("p{}", connection),
            is_human: true,
            deck: vec![CardId::new(1), CardId::new(2)],
        }
    }

    #[test]
    fn test_player_id_next_wraps() {
        assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
        assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
        assert_eq!(PlayerId::new(2).next(4), PlayerId::new(3));
        assert_eq!(format!("{}", PlayerId::new(1)), "Player 1");
    }

    #[test]
    fn test_player_map_from_vec() {
        let map = PlayerMap::from_vec(vec![10, 20, 30]);
        assert_eq!(map.player_count(), 3);
        assert_eq!(map.get(PlayerId::new(2)), Some(&30));
        assert_eq!(map.get(PlayerId::new(3)), None);
    }

    #[test]
    fn test_player_map_iter() {
        let map = PlayerMap::from_vec(vec![0, 1, 2]);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[2], (PlayerId::new(2), &2));
        assert_eq!(map.player_ids().count(), 3);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::from_vec(Vec::new());
    }

    #[test]
    fn test_player_info_from_config() {
        let config = MatchConfig::default();
        let player = PlayerInfo::new(PlayerId::new(1), registration(7), &config);

        assert_eq!(player.connection, ConnectionId(7));
        assert_eq!(player.stats.len(), config.player_stats.len());
        assert!(player.zones.by_name(&config.zone_names.library).is_some());
        assert!(player.zones.by_name(&config.zone_names.board).is_some());
        assert!(!player.is_active);
    }

    #[test]
    fn test_instance_ids_monotonic() {
        let config = MatchConfig::default();
        let mut player = PlayerInfo::new(PlayerId::new(0), registration(1), &config);

        let a = player.alloc_instance_id();
        let b = player.alloc_instance_id();
        assert!(a < b);
        assert_eq!(player.peek_instance_id(), InstanceId(2));
    }
}
