//! Game actions: the discrete mutations the solver applies.
//!
//! An action is built by the solver while expanding an effect or a client
//! request, applied once against the `GameState`, appended to the history
//! and dropped. Actions are plain data; applying them lives in
//! [`EffectSolver::apply`](crate::effects::EffectSolver::apply).
//!
//! ## Example
//!
//! ```
//! use ccg_server::core::{GameAction, PlayerId, StatId};
//!
//! let burn = GameAction::ModifyPlayerStat {
//!     player: PlayerId::new(1),
//!     stat: StatId::new(0),
//!     delta: -3,
//! };
//! assert_eq!(burn.name(), "ModifyPlayerStat");
//! ```

use serde::{Deserialize, Serialize};

use super::config::ZoneId;
use super::entity::{CardRef, InstanceId};
use super::player::PlayerId;
use super::stat::{Modifier, StatId};
use crate::cards::{CardId, RuntimeKeyword};
use crate::zones::ZonePosition;

/// A single typed mutation of game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Add `delta` to a player stat's base value.
    ModifyPlayerStat { player: PlayerId, stat: StatId, delta: i64 },
    SetPlayerStat { player: PlayerId, stat: StatId, value: i64 },
    /// Add `delta` to a card stat's base value.
    ModifyCardStat { card: CardRef, stat: StatId, delta: i64 },
    SetCardStat { card: CardRef, stat: StatId, value: i64 },
    AddCardModifier { card: CardRef, stat: StatId, modifier: Modifier },
    /// Move up to `count` cards from the top of the library into the hand.
    DrawCards { player: PlayerId, count: usize },
    /// Relocate a card between two of its owner's zones.
    MoveCard {
        card: CardRef,
        from: ZoneId,
        to: ZoneId,
        position: ZonePosition,
    },
    /// Instantiate a new card for `player` directly into a zone.
    CreateCard { player: PlayerId, card_id: CardId, zone: ZoneId },
    AddKeyword { card: CardRef, keyword: RuntimeKeyword },
    RemoveKeyword { card: CardRef, keyword: RuntimeKeyword },
    ShuffleZone { player: PlayerId, zone: ZoneId },
}

impl GameAction {
    /// Variant name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameAction::ModifyPlayerStat { .. } => "ModifyPlayerStat",
            GameAction::SetPlayerStat { .. } => "SetPlayerStat",
            GameAction::ModifyCardStat { .. } => "ModifyCardStat",
            GameAction::SetCardStat { .. } => "SetCardStat",
            GameAction::AddCardModifier { .. } => "AddCardModifier",
            GameAction::DrawCards { .. } => "DrawCards",
            GameAction::MoveCard { .. } => "MoveCard",
            GameAction::CreateCard { .. } => "CreateCard",
            GameAction::AddKeyword { .. } => "AddKeyword",
            GameAction::RemoveKeyword { .. } => "RemoveKeyword",
            GameAction::ShuffleZone { .. } => "ShuffleZone",
        }
    }
}

/// What applying an action produced, beyond the state change itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Done,
    /// Instances drawn, top first.
    Drawn(Vec<InstanceId>),
    Created(CardRef),
}

/// A resolved action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Player on whose behalf the action ran.
    pub player: PlayerId,
    pub action: GameAction,
    /// Turn number when the action resolved.
    pub turn: u32,
    /// Position in the match-wide action sequence.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: GameAction, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}

/// Something the session must tell clients about.
///
/// The solver never talks to the network; it queues events on the state and
/// the session drains them after each handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CardsDrawn {
        player: PlayerId,
        instances: Vec<InstanceId>,
    },
    CardCreated { card: CardRef, zone: ZoneId },
    CardMoved { card: CardRef, from: ZoneId, to: ZoneId },
}
