//! The match actor: one tokio task per match.
//!
//! Everything that can change a match arrives as a [`MatchEvent`] on the
//! actor's queue and is handled one at a time, so the session needs no
//! locking. The turn timer is a `Sleep` polled in the same `select!`; it is
//! re-armed whenever the turn number changes and dropped at game over.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

use super::match_session::MatchSession;
use super::outbox::{Outbox, Peer};
use crate::core::{ConnectionId, Error, Result};
use crate::protocol::ClientMessage;

/// Capacity of a match's event queue.
pub const MATCH_QUEUE_CAPACITY: usize = 256;

/// Answer to a seat request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatReply {
    Seated,
    /// Every seat is held by a live connection.
    Full,
    /// The match has started or stopped and takes no more players.
    Closed,
}

/// Input to a match actor.
#[derive(Debug)]
pub enum MatchEvent {
    /// A connection asks for a seat; once seated its messages go out
    /// through `peer`.
    Join {
        connection: ConnectionId,
        peer: Peer,
        reply: oneshot::Sender<SeatReply>,
    },
    Message {
        connection: ConnectionId,
        message: ClientMessage,
    },
    Disconnected(ConnectionId),
    /// The timer armed for `turn` fired.
    TurnTimeout { turn: u32 },
    /// Stop the actor.
    Shutdown,
}

/// Cloneable address of a running match.
#[derive(Clone, Debug)]
pub struct MatchHandle {
    id: u64,
    tx: mpsc::Sender<MatchEvent>,
}

impl MatchHandle {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue an event. Fails once the actor has stopped.
    pub async fn send(&self, event: MatchEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| Error::MatchClosed)
    }

    pub async fn message(&self, connection: ConnectionId, message: ClientMessage) -> Result<()> {
        self.send(MatchEvent::Message {
            connection,
            message,
        })
        .await
    }

    /// Ask the match to seat `connection`.
    pub async fn join(&self, connection: ConnectionId, peer: Peer) -> SeatReply {
        let (reply, answer) = oneshot::channel();
        if self.send(MatchEvent::Join { connection, peer, reply }).await.is_err() {
            return SeatReply::Closed;
        }
        answer.await.unwrap_or(SeatReply::Closed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawn an actor for `session`.
///
/// The join handle yields the session back once the match ends.
pub fn spawn_match<O: Outbox + 'static>(
    id: u64,
    session: MatchSession<O>,
) -> (MatchHandle, JoinHandle<MatchSession<O>>) {
    let (tx, rx) = mpsc::channel(MATCH_QUEUE_CAPACITY);
    let task = tokio::spawn(run_match(id, session, rx));
    (MatchHandle { id, tx }, task)
}

/// Actor loop. Runs until game over, `Shutdown`, or every handle is dropped.
pub async fn run_match<O: Outbox>(
    id: u64,
    mut session: MatchSession<O>,
    mut events: mpsc::Receiver<MatchEvent>,
) -> MatchSession<O> {
    let turn_duration = session.config().turn_duration();
    let timer = tokio::time::sleep(turn_duration);
    tokio::pin!(timer);
    let mut armed: Option<u32> = None;
    info!(match_id = id, "match actor started");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(MatchEvent::Shutdown) | None => break,
                Some(event) => session.handle_event(event),
            },
            () = &mut timer, if armed.is_some() => {
                if let Some(turn) = armed.take() {
                    session.handle_event(MatchEvent::TurnTimeout { turn });
                }
            }
        }

        if session.is_over() {
            break;
        }
        match session.timer_turn() {
            Some(turn) if armed != Some(turn) => {
                timer.as_mut().reset(Instant::now() + turn_duration);
                armed = Some(turn);
            }
            Some(_) => {}
            None => armed = None,
        }
    }

    session.teardown();
    info!(match_id = id, phase = ?session.phase(), "match actor stopped");
    session
}
