//! Outbound message delivery.

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use crate::core::{ConnectionId, Error, Result};
use crate::protocol::ServerMessage;

/// Sender half of a connection's write queue.
pub type Peer = mpsc::UnboundedSender<ServerMessage>;

/// Where a session sends its messages.
///
/// A failed send concerns only that connection; the session logs it and
/// carries on with the other recipients.
pub trait Outbox: Send {
    fn send(&mut self, connection: ConnectionId, message: ServerMessage) -> Result<()>;

    /// A connection's write queue became available.
    fn connect(&mut self, _connection: ConnectionId, _peer: Peer) {}

    fn disconnect(&mut self, _connection: ConnectionId) {}
}

/// Delivers into per-connection channels drained by writer tasks.
#[derive(Debug, Default)]
pub struct ChannelOutbox {
    peers: FxHashMap<ConnectionId, Peer>,
}

impl ChannelOutbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

impl Outbox for ChannelOutbox {
    fn send(&mut self, connection: ConnectionId, message: ServerMessage) -> Result<()> {
        let peer = self
            .peers
            .get(&connection)
            .ok_or_else(|| Error::ConnectionClosed(connection.to_string()))?;
        peer.send(message)
            .map_err(|_| Error::ConnectionClosed(connection.to_string()))
    }

    fn connect(&mut self, connection: ConnectionId, peer: Peer) {
        self.peers.insert(connection, peer);
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        self.peers.remove(&connection);
    }
}

/// Keeps every message in memory, in send order.
#[derive(Clone, Debug, Default)]
pub struct RecordingOutbox {
    pub sent: Vec<(ConnectionId, ServerMessage)>,
}

impl RecordingOutbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent to one connection.
    pub fn to(&self, connection: ConnectionId) -> impl Iterator<Item = &ServerMessage> {
        self.sent
            .iter()
            .filter(move |(c, _)| *c == connection)
            .map(|(_, m)| m)
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<(ConnectionId, ServerMessage)> {
        std::mem::take(&mut self.sent)
    }
}

impl Outbox for RecordingOutbox {
    fn send(&mut self, connection: ConnectionId, message: ServerMessage) -> Result<()> {
        self.sent.push((connection, message));
        Ok(())
    }
}
