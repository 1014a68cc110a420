//! Core match types: identifiers, players, stats, state, actions, RNG,
//! configuration and error reporting.
//!
//! Everything here is game-agnostic. A particular card game is described by
//! a `MatchConfig` and a card registry, not by changes to these types.

pub mod entity;
pub mod player;
pub mod stat;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;
pub mod diagnostics;

pub use entity::{CardRef, ConnectionId, InstanceId, NetId};
pub use player::{PlayerId, PlayerInfo, PlayerMap, Registration};
pub use stat::{Modifier, Stat, StatBlock, StatId, StatTemplate};
pub use rng::GameRng;
pub use config::{
    CombatConfig, MatchConfig, ZoneConfig, ZoneId, ZoneNames, ZoneVisibility,
    DEFAULT_MAX_FRAME_BYTES,
};
pub use action::{ActionRecord, Applied, GameAction, GameEvent};
pub use state::GameState;
pub use error::{Error, Result};
pub use diagnostics::{Diagnostics, Outcome, Rejection, DIAGNOSTICS_CAPACITY};
