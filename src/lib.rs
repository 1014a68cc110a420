//! # ccg-server
//!
//! An authoritative multiplayer card game server. The server keeps the
//! canonical match state, accepts player intents over the network, resolves
//! them with a deterministic rules interpreter and sends each participant
//! what they are allowed to see.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Cards**: Cards declare stats, keywords, costs, triggered
//!    effects and activated abilities as plain data. Effects are a closed
//!    enum interpreted in one place.
//!
//! 2. **N-Player First**: Every API takes the seat count from the state.
//!    Nothing assumes exactly two players.
//!
//! 3. **Configuration Over Convention**: Zones, player stats, combat stat
//!    names and turn-start effects come from `MatchConfig`.
//!
//! 4. **Single Writer**: Each match is owned by one actor task; the effect
//!    solver is the only code that mutates game state.
//!
//! ## Modules
//!
//! - `core`: ids, players, stats, config, RNG, actions, state, errors, diagnostics
//! - `zones`: owned card containers
//! - `cards`: definitions, runtime instances, registry
//! - `values`: value and condition evaluators
//! - `effects`: effects, targeting, costs and the effect solver
//! - `rules`: setup, turn sequencing, win detection
//! - `protocol`: wire messages, redacted views, framing
//! - `session`: match sessions, handlers and the match actor
//! - `transport`: TCP listener
//! - `games`: bundled card sets

pub mod core;
pub mod zones;
pub mod cards;
pub mod values;
pub mod effects;
pub mod rules;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    CardRef, ConnectionId, Diagnostics, Error, GameAction, GameRng, GameState, InstanceId,
    MatchConfig, NetId, Outcome, PlayerId, PlayerInfo, Registration, Rejection, Result, Stat,
    StatBlock, StatId, ZoneConfig, ZoneId, ZoneVisibility,
};

pub use crate::zones::{Zone, ZonePosition, ZoneSet};

pub use crate::cards::{CardDefinition, CardId, CardRegistry, RuntimeCard, RuntimeKeyword};

pub use crate::values::{Condition, Value, ValueContext};

pub use crate::effects::{Cost, Effect, EffectSolver, Trigger, TriggeredEffect};

pub use crate::rules::{GameResult, MatchPhase};

pub use crate::protocol::{ClientMessage, ServerMessage};

pub use crate::session::{MatchEvent, MatchSession, Outbox};
