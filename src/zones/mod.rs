//! Zone system for card locations.
//!
//! Zones are **match-configured**, not hardcoded. The `MatchConfig` lists the
//! zones every player gets (library, hand, board, graveyard...) and each
//! player owns one `Zone` per entry, holding the `RuntimeCard`s themselves.
//!
//! ## Key Types
//!
//! - `Zone`: ordered card container with visibility and optional capacity
//! - `ZoneSet`: a player's zones, indexed by id and by name
//! - `ZonePosition`: where a card lands when inserted

pub mod zone;
pub mod set;

pub use set::ZoneSet;
pub use zone::{Zone, ZonePosition};

pub use crate::core::config::{ZoneConfig, ZoneId, ZoneVisibility};
