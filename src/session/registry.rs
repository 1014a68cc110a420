//! Per-kind message handler table.

use rustc_hash::FxHashMap;

use super::match_session::MatchSession;
use super::outbox::Outbox;
use crate::core::{ConnectionId, Outcome};
use crate::protocol::{ClientMessage, MessageKind};

/// A message handler.
pub type Handler<O> = fn(&mut MatchSession<O>, ConnectionId, ClientMessage) -> Outcome<()>;

/// Handlers keyed by message kind.
pub struct HandlerRegistry<O: Outbox> {
    handlers: FxHashMap<MessageKind, Handler<O>>,
}

impl<O: Outbox> Default for HandlerRegistry<O> {
    fn default() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }
}

impl<O: Outbox> HandlerRegistry<O> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the kind.
    pub fn register(&mut self, kind: MessageKind, handler: Handler<O>) {
        self.handlers.insert(kind, handler);
    }

    pub fn unregister(&mut self, kind: MessageKind) -> Option<Handler<O>> {
        self.handlers.remove(&kind)
    }

    #[must_use]
    pub fn get(&self, kind: MessageKind) -> Option<Handler<O>> {
        self.handlers.get(&kind).copied()
    }

    #[must_use]
    pub fn is_registered(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
