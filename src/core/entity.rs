//! Identifiers for runtime objects.
//!
//! ## ID Layout
//!
//! - `InstanceId`: per-player card instance counter. Two players may both own
//!   an instance 0; the pair `(owner, instance)` is what identifies a card in a
//!   match, see [`CardRef`].
//! - `NetId`: network identity a client claims when registering.
//! - `ConnectionId`: transport connection handle, assigned by the transport.
//!
//! ```
//! use ccg_server::core::{CardRef, InstanceId, PlayerId};
//!
//! let a = CardRef::new(PlayerId::new(0), InstanceId(3));
//! let b = CardRef::new(PlayerId::new(1), InstanceId(3));
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Card instance identifier, unique within the owning player's match lifetime.
///
/// Allocated from `PlayerInfo::next_instance_id`; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Fully qualified reference to a card in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    /// Owning player.
    pub owner: PlayerId,
    /// Instance ID within the owner's cards.
    pub instance: InstanceId,
}

impl CardRef {
    #[must_use]
    pub const fn new(owner: PlayerId, instance: InstanceId) -> Self {
        Self { owner, instance }
    }
}

impl std::fmt::Display for CardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.instance)
    }
}

/// Network identity of a player, as claimed in `RegisterPlayer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetId(pub u32);

impl std::fmt::Display for NetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Net({})", self.0)
    }
}

/// Transport-level connection handle.
///
/// The session trusts the transport to attach the right connection to every
/// inbound message; authority checks compare against this, never against the
/// `NetId` a client puts in its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Conn({})", self.0)
    }
}
