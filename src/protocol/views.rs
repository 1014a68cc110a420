//! Per-recipient snapshots of player state.
//!
//! A view is built for one viewer. The owner sees every zone in full;
//! other players see card lists only for public zones, and a count for the
//! rest.

use serde::{Deserialize, Serialize};

use crate::cards::RuntimeCard;
use crate::core::{InstanceId, NetId, PlayerInfo, Stat, StatId, ZoneId};
use crate::zones::Zone;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatView {
    pub id: StatId,
    pub name: String,
    pub base: i64,
    pub effective: i64,
    pub min: i64,
    pub max: i64,
}

impl From<&Stat> for StatView {
    fn from(stat: &Stat) -> Self {
        Self {
            id: stat.id,
            name: stat.name.clone(),
            base: stat.base_value(),
            effective: stat.effective_value(),
            min: stat.min_value,
            max: stat.max_value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub card_id: crate::cards::CardId,
    pub instance: InstanceId,
    pub stats: Vec<StatView>,
    /// `(keyword, value)` pairs.
    pub keywords: Vec<(u16, u16)>,
}

impl From<&RuntimeCard> for CardView {
    fn from(card: &RuntimeCard) -> Self {
        Self {
            card_id: card.card_id,
            instance: card.instance_id,
            stats: card.stats.iter_sorted().map(StatView::from).collect(),
            keywords: card.keyword_pairs(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneView {
    pub id: ZoneId,
    pub name: String,
    pub count: u32,
    /// `None` when hidden from the viewer.
    pub cards: Option<Vec<CardView>>,
}

impl ZoneView {
    #[must_use]
    pub fn build(zone: &Zone, viewer_is_owner: bool) -> Self {
        let cards = zone
            .visibility
            .visible_to(viewer_is_owner)
            .then(|| zone.cards().iter().map(CardView::from).collect());
        Self {
            id: zone.id,
            name: zone.name.clone(),
            count: zone.len() as u32,
            cards,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub net_id: NetId,
    pub index: u8,
    pub nickname: String,
    pub is_active: bool,
    pub stats: Vec<StatView>,
    pub zones: Vec<ZoneView>,
}

impl PlayerView {
    /// Snapshot `player` as seen by its owner or by someone else.
    #[must_use]
    pub fn build(player: &PlayerInfo, viewer_is_owner: bool) -> Self {
        Self {
            net_id: player.net_id,
            index: player.id.0,
            nickname: player.nickname.clone(),
            is_active: player.is_active,
            stats: player.stats.iter_sorted().map(StatView::from).collect(),
            zones: player
                .zones
                .iter_sorted()
                .map(|z| ZoneView::build(z, viewer_is_owner))
                .collect(),
        }
    }

    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&ZoneView> {
        self.zones.iter().find(|z| z.name == name)
    }

    #[must_use]
    pub fn stat(&self, name: &str) -> Option<&StatView> {
        self.stats.iter().find(|s| s.name == name)
    }
}
