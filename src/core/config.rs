//! Match configuration.
//!
//! A match is configured at startup by a `MatchConfig`:
//! - `ZoneConfig`: the zones every player gets (library, hand, board...)
//! - `StatTemplate`s: the stats every player gets (life, mana...)
//! - `ZoneNames` / `CombatConfig`: which of those the rules engine treats
//!   specially
//! - start-of-turn effects, turn duration, seed policy
//!
//! Nothing here is hardcoded in the solver; a different game layout is a
//! different config. Configs are plain serde data and can be loaded with
//! [`MatchConfig::from_json`].

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::stat::{StatId, StatTemplate};
use crate::effects::PlayerEffect;
use crate::values::Value;

/// Default upper bound for a single wire frame.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 1 << 20;

/// Zone identifier, shared by every player's copy of the zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u16);

impl ZoneId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// Who may see the cards in a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// All cards visible to all players (board, graveyard).
    Public,
    /// Cards visible only to the zone owner (hand).
    OwnerOnly,
    /// Cards visible to nobody; only the count is known (library).
    Hidden,
}

impl ZoneVisibility {
    /// Can a viewer with the given relation to the owner see card contents?
    #[must_use]
    pub fn visible_to(self, is_owner: bool) -> bool {
        match self {
            ZoneVisibility::Public => true,
            ZoneVisibility::OwnerOnly => is_owner,
            ZoneVisibility::Hidden => false,
        }
    }
}

/// Layout of one per-player zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: ZoneId,
    pub name: String,
    pub visibility: ZoneVisibility,
    /// Is card order significant? (true for library, false for board).
    pub ordered: bool,
    /// Maximum cards allowed. `None` for unlimited.
    pub max_cards: Option<usize>,
}

impl ZoneConfig {
    /// A public, unordered, unlimited zone.
    pub fn new(id: ZoneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visibility: ZoneVisibility::Public,
            ordered: false,
            max_cards: None,
        }
    }

    /// Set visibility to owner-only (like a hand).
    #[must_use]
    pub fn owner_only(mut self) -> Self {
        self.visibility = ZoneVisibility::OwnerOnly;
        self
    }

    /// Set visibility to hidden (like a face-down library).
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visibility = ZoneVisibility::Hidden;
        self
    }

    #[must_use]
    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    #[must_use]
    pub fn with_max_cards(mut self, max: usize) -> Self {
        self.max_cards = Some(max);
        self
    }
}

/// Zones the rules engine refers to by role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneNames {
    pub library: String,
    pub hand: String,
    pub board: String,
    pub graveyard: String,
}

impl Default for ZoneNames {
    fn default() -> Self {
        Self {
            library: "Library".into(),
            hand: "Hand".into(),
            board: "Board".into(),
            graveyard: "Graveyard".into(),
        }
    }
}

/// Stat names used by combat and the win check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Creature stat dealt as damage.
    pub attack_stat: String,
    /// Creature stat that takes damage.
    pub health_stat: String,
    /// Player stat that takes damage; a player at or below 0 is out.
    pub player_health_stat: String,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_stat: "Attack".into(),
            health_stat: "Health".into(),
            player_health_stat: "Life".into(),
        }
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Number of players seated before the game starts.
    pub players_per_match: usize,
    pub turn_duration_secs: u64,
    pub starting_hand_size: usize,
    pub player_stats: Vec<StatTemplate>,
    pub zones: Vec<ZoneConfig>,
    pub zone_names: ZoneNames,
    pub combat: CombatConfig,
    /// Effects applied to the new active player at the start of every turn.
    pub turn_start_effects: Vec<PlayerEffect>,
    /// Fixed RNG seed. `None` draws a fresh seed per match.
    pub seed: Option<u64>,
    pub max_frame_bytes: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let mana = StatId::new(1);
        Self {
            players_per_match: 2,
            turn_duration_secs: 60,
            starting_hand_size: 3,
            player_stats: vec![
                StatTemplate::new(StatId::new(0), "Life", 20, 0, 99),
                StatTemplate::new(mana, "Mana", 0, 0, 10),
            ],
            zones: vec![
                ZoneConfig::new(ZoneId::new(0), "Library").hidden().ordered(),
                ZoneConfig::new(ZoneId::new(1), "Hand")
                    .owner_only()
                    .ordered()
                    .with_max_cards(10),
                ZoneConfig::new(ZoneId::new(2), "Board"),
                ZoneConfig::new(ZoneId::new(3), "Graveyard").ordered(),
            ],
            zone_names: ZoneNames::default(),
            combat: CombatConfig::default(),
            turn_start_effects: vec![
                PlayerEffect::IncreaseStat {
                    stat: mana,
                    value: Value::Constant(1),
                },
                PlayerEffect::DrawCards {
                    count: Value::Constant(1),
                },
            ],
            seed: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl MatchConfig {
    /// Default layout for the given number of players.
    pub fn new(players_per_match: usize) -> Self {
        Self {
            players_per_match,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_turn_duration_secs(mut self, secs: u64) -> Self {
        self.turn_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the player stat templates.
    #[must_use]
    pub fn with_player_stats(mut self, stats: Vec<StatTemplate>) -> Self {
        self.player_stats = stats;
        self
    }

    #[must_use]
    pub fn with_zone(mut self, zone: ZoneConfig) -> Self {
        self.zones.push(zone);
        self
    }

    /// Replace the start-of-turn effects.
    #[must_use]
    pub fn with_turn_start_effects(mut self, effects: Vec<PlayerEffect>) -> Self {
        self.turn_start_effects = effects;
        self
    }

    #[must_use]
    pub fn with_max_frame_bytes(mut self, max: usize) -> Self {
        self.max_frame_bytes = max;
        self
    }

    #[must_use]
    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.turn_duration_secs)
    }

    /// Get a zone config by ID.
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Get a zone config by name.
    #[must_use]
    pub fn zone_named(&self, name: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if !(2..=255).contains(&self.players_per_match) {
            return Err(Error::InvalidConfig(format!(
                "players_per_match must be in 2..=255, got {}",
                self.players_per_match
            )));
        }
        if self.turn_duration_secs == 0 {
            return Err(Error::InvalidConfig("turn_duration_secs must be positive".into()));
        }
        if self.max_frame_bytes == 0 {
            return Err(Error::InvalidConfig("max_frame_bytes must be positive".into()));
        }

        let mut zone_ids = FxHashSet::default();
        let mut zone_names = FxHashSet::default();
        for zone in &self.zones {
            if !zone_ids.insert(zone.id) || !zone_names.insert(zone.name.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate zone '{}'", zone.name)));
            }
        }
        for role in [
            &self.zone_names.library,
            &self.zone_names.hand,
            &self.zone_names.board,
            &self.zone_names.graveyard,
        ] {
            if !zone_names.contains(role.as_str()) {
                return Err(Error::InvalidConfig(format!("zone '{}' is not configured", role)));
            }
        }

        let mut stat_ids = FxHashSet::default();
        let mut stat_names = FxHashSet::default();
        for stat in &self.player_stats {
            if !stat_ids.insert(stat.id) || !stat_names.insert(stat.name.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate player stat '{}'", stat.name)));
            }
        }
        if !stat_names.contains(self.combat.player_health_stat.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "player health stat '{}' is not configured",
                self.combat.player_health_stat
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id() {
        let id = ZoneId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "Zone(5)");
    }

    #[test]
    fn test_zone_config_builder() {
        let zone = ZoneConfig::new(ZoneId::new(0), "Hand")
            .owner_only()
            .with_max_cards(7);

        assert_eq!(zone.visibility, ZoneVisibility::OwnerOnly);
        assert_eq!(zone.max_cards, Some(7));
        assert!(!zone.ordered);
    }

    #[test]
    fn test_visibility() {
        assert!(ZoneVisibility::Public.visible_to(false));
        assert!(ZoneVisibility::OwnerOnly.visible_to(true));
        assert!(!ZoneVisibility::OwnerOnly.visible_to(false));
        assert!(!ZoneVisibility::Hidden.visible_to(true));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.turn_duration(), Duration::from_secs(60));
        assert!(config.zone_named("Board").is_some());
        assert_eq!(config.zone(ZoneId::new(1)).map(|z| z.name.as_str()), Some("Hand"));
    }

    #[test]
    fn test_validate_rejects_single_player() {
        let config = MatchConfig::new(1);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_zone() {
        let config = MatchConfig::default().with_zone(ZoneConfig::new(ZoneId::new(9), "Hand"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_role_zone() {
        let mut config = MatchConfig::default();
        config.zone_names.graveyard = "Discard".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_health_stat() {
        let config = MatchConfig::default()
            .with_player_stats(vec![StatTemplate::new(StatId::new(0), "Mana", 0, 0, 10)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = MatchConfig::from_json(r#"{"players_per_match": 3, "seed": 7}"#).unwrap();
        assert_eq!(config.players_per_match, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.zones.len(), 4);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(MatchConfig::from_json(r#"{"turn_duration_secs": 0}"#).is_err());
        assert!(matches!(MatchConfig::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_builders() {
        let config = MatchConfig::new(4)
            .with_turn_duration_secs(5)
            .with_starting_hand_size(0)
            .with_seed(11)
            .with_max_frame_bytes(512)
            .with_turn_start_effects(Vec::new());
        assert_eq!(config.players_per_match, 4);
        assert_eq!(config.turn_duration_secs, 5);
        assert_eq!(config.starting_hand_size, 0);
        assert_eq!(config.seed, Some(11));
        assert!(config.turn_start_effects.is_empty());
        assert_eq!(config.max_frame_bytes, 512);
        assert!(config.validate().is_ok());
    }
}
