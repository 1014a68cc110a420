//! Wire messages.
//!
//! Players are named by [`NetId`] on the wire; seats and connection ids stay
//! server-side. Zones are named by id, cards by their owner's instance id.

use serde::{Deserialize, Serialize};

use super::views::{CardView, PlayerView};
use crate::cards::CardId;
use crate::core::{InstanceId, NetId, ZoneId};
use crate::effects::TargetInfo;

/// Client-to-server messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Join the match with a deck.
    RegisterPlayer {
        net_id: NetId,
        nickname: String,
        is_human: bool,
        deck: Vec<CardId>,
    },
    /// Play or move one of your cards.
    MoveCard {
        player: NetId,
        instance: InstanceId,
        origin: ZoneId,
        destination: ZoneId,
        target_info: TargetInfo,
    },
    /// Attack the next opponent directly.
    FightPlayer { player: NetId, attacker: InstanceId },
    /// Attack a creature owned by `defender`.
    FightCreature {
        player: NetId,
        attacker: InstanceId,
        defender: NetId,
        attacked: InstanceId,
    },
    ActivateAbility {
        player: NetId,
        zone: ZoneId,
        instance: InstanceId,
        ability_index: u32,
    },
    /// End your turn.
    StopTurn,
}

/// Handler key for a client message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    RegisterPlayer,
    MoveCard,
    FightPlayer,
    FightCreature,
    ActivateAbility,
    StopTurn,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::RegisterPlayer,
        MessageKind::MoveCard,
        MessageKind::FightPlayer,
        MessageKind::FightCreature,
        MessageKind::ActivateAbility,
        MessageKind::StopTurn,
    ];

    /// Whether the message is only accepted from the turn owner.
    #[must_use]
    pub fn is_turn_scoped(self) -> bool {
        !matches!(self, MessageKind::RegisterPlayer)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl ClientMessage {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            ClientMessage::RegisterPlayer { .. } => MessageKind::RegisterPlayer,
            ClientMessage::MoveCard { .. } => MessageKind::MoveCard,
            ClientMessage::FightPlayer { .. } => MessageKind::FightPlayer,
            ClientMessage::FightCreature { .. } => MessageKind::FightCreature,
            ClientMessage::ActivateAbility { .. } => MessageKind::ActivateAbility,
            ClientMessage::StopTurn => MessageKind::StopTurn,
        }
    }
}

/// Server-to-client messages.
///
/// Messages carrying views are built per recipient: `own` is unredacted,
/// `opponents` only show what the recipient may see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    StartGame {
        recipient: NetId,
        player_index: u8,
        turn_duration_secs: u64,
        /// Nicknames in seat order.
        nicknames: Vec<String>,
        own: PlayerView,
        opponents: Vec<PlayerView>,
        rng_seed: u64,
    },
    StartTurn {
        recipient: NetId,
        is_active: bool,
        turn: u32,
        own: PlayerView,
        opponents: Vec<PlayerView>,
    },
    EndTurn {
        recipient: NetId,
        is_active: bool,
        turn: u32,
        own: PlayerView,
        opponents: Vec<PlayerView>,
    },
    /// A card changed zones. `card` is present when the destination is
    /// visible to the recipient.
    CardMoved {
        player: NetId,
        instance: InstanceId,
        origin: ZoneId,
        destination: ZoneId,
        target_info: TargetInfo,
        card: Option<CardView>,
    },
    /// A card was created by an effect.
    CardCreated {
        player: NetId,
        zone: ZoneId,
        instance: InstanceId,
        card: Option<CardView>,
    },
    PlayerAttacked { player: NetId, attacker: InstanceId },
    CreatureAttacked {
        player: NetId,
        attacker: InstanceId,
        defender: NetId,
        attacked: InstanceId,
    },
    ActivateAbility {
        player: NetId,
        zone: ZoneId,
        instance: InstanceId,
        ability_index: u32,
    },
    /// Sent to the drawing player.
    PlayerDrewCards { player: NetId, cards: Vec<CardView> },
    /// Sent to everyone else.
    OpponentDrewCards { player: NetId, count: u32 },
    /// `winner` is `None` on a draw.
    EndGame { winner: Option<NetId> },
}

impl ServerMessage {
    /// Variant name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ServerMessage::StartGame { .. } => "StartGame",
            ServerMessage::StartTurn { .. } => "StartTurn",
            ServerMessage::EndTurn { .. } => "EndTurn",
            ServerMessage::CardMoved { .. } => "CardMoved",
            ServerMessage::CardCreated { .. } => "CardCreated",
            ServerMessage::PlayerAttacked { .. } => "PlayerAttacked",
            ServerMessage::CreatureAttacked { .. } => "CreatureAttacked",
            ServerMessage::ActivateAbility { .. } => "ActivateAbility",
            ServerMessage::PlayerDrewCards { .. } => "PlayerDrewCards",
            ServerMessage::OpponentDrewCards { .. } => "OpponentDrewCards",
            ServerMessage::EndGame { .. } => "EndGame",
        }
    }
}
