//! Match sessions: authority checks, message dispatch, broadcasts and the
//! per-match actor task.

pub mod actor;
mod handlers;
pub mod match_session;
pub mod outbox;
pub mod registry;

pub use actor::{run_match, spawn_match, MatchEvent, MatchHandle, SeatReply, MATCH_QUEUE_CAPACITY};
pub use match_session::MatchSession;
pub use outbox::{ChannelOutbox, Outbox, Peer, RecordingOutbox};
pub use registry::{Handler, HandlerRegistry};
