//! A player's zones, indexed by id and by name.

use rustc_hash::FxHashMap;

use super::zone::Zone;
use crate::cards::RuntimeCard;
use crate::core::config::ZoneId;
use crate::core::entity::InstanceId;

/// Owning `ZoneId -> Zone` map plus a `name -> ZoneId` index.
///
/// ```
/// use ccg_server::core::{PlayerId, ZoneConfig, ZoneId};
/// use ccg_server::zones::{Zone, ZoneSet};
///
/// let mut zones = ZoneSet::new();
/// zones.insert(Zone::from_config(&ZoneConfig::new(ZoneId::new(2), "Board"), PlayerId::new(0)));
///
/// assert_eq!(zones.id_of("Board"), Some(ZoneId::new(2)));
/// assert!(zones.by_name("Hand").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneSet {
    zones: FxHashMap<ZoneId, Zone>,
    names: FxHashMap<String, ZoneId>,
}

impl ZoneSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a zone, replacing any zone with the same id.
    pub fn insert(&mut self, zone: Zone) {
        if let Some(previous) = self.zones.get(&zone.id) {
            self.names.remove(&previous.name);
        }
        self.names.insert(zone.name.clone(), zone.id);
        self.zones.insert(zone.id, zone);
    }

    #[must_use]
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn get_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(&id)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Zone> {
        self.names.get(name).and_then(|id| self.zones.get(id))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Zone> {
        let id = *self.names.get(name)?;
        self.zones.get_mut(&id)
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ZoneId> {
        self.names.get(name).copied()
    }

    /// Number of cards in the named zone, 0 if it doesn't exist.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.by_name(name).map_or(0, Zone::len)
    }

    /// Zones in id order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Zone> {
        let mut zones: Vec<_> = self.zones.values().collect();
        zones.sort_by_key(|z| z.id);
        zones.into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Zone> {
        self.zones.values_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Find a card in any zone.
    #[must_use]
    pub fn find_card(&self, instance: InstanceId) -> Option<(ZoneId, &RuntimeCard)> {
        self.zones
            .values()
            .find_map(|z| z.get(instance).map(|c| (z.id, c)))
    }

    pub fn find_card_mut(&mut self, instance: InstanceId) -> Option<&mut RuntimeCard> {
        self.zones.values_mut().find_map(|z| z.get_mut(instance))
    }

    /// Total cards across all zones.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.zones.values().map(Zone::len).sum()
    }
}
