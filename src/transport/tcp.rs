//! TCP listener.
//!
//! Incoming connections are seated into matches of `players_per_match`.
//! A match hands out its own seats, so one freed by a client that leaves
//! before the start goes to the next arrival. Each connection gets a reader
//! task feeding the actor and a writer task draining its outbound queue, so
//! one slow or broken socket never stalls the others.

use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::{ConnectionId, Error, Result};
use crate::effects::EffectSolver;
use crate::protocol::{ClientMessage, FrameCodec, ServerMessage};
use crate::session::{spawn_match, ChannelOutbox, MatchEvent, MatchHandle, MatchSession, SeatReply};

/// Pause after a failed accept, so a full descriptor table isn't spun on.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Accept connections forever, seating them into matches.
pub async fn serve(listener: TcpListener, solver: EffectSolver) -> Result<()> {
    let codec = FrameCodec::new(solver.config().max_frame_bytes);
    let players_per_match = solver.config().players_per_match;
    let mut next_connection = 0u64;
    let mut next_match = 0u64;
    // Matches still waiting for players, oldest first.
    let mut lobbies: Vec<MatchHandle> = Vec::new();

    info!(addr = %listener.local_addr()?, players_per_match, "listening");
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        next_connection += 1;
        let connection = ConnectionId(next_connection);
        let (peer, outbound) = mpsc::unbounded_channel::<ServerMessage>();

        let mut seated = None;
        let mut i = 0;
        while i < lobbies.len() {
            match lobbies[i].join(connection, peer.clone()).await {
                SeatReply::Seated => {
                    seated = Some(lobbies[i].clone());
                    break;
                }
                SeatReply::Full => i += 1,
                SeatReply::Closed => {
                    lobbies.remove(i);
                }
            }
        }
        let handle = match seated {
            Some(handle) => handle,
            None => {
                next_match += 1;
                let session = MatchSession::new(solver.clone(), ChannelOutbox::new());
                let (handle, _task) = spawn_match(next_match, session);
                if handle.join(connection, peer).await != SeatReply::Seated {
                    warn!(%connection, match_id = handle.id(), "new match refused its first player");
                    continue;
                }
                lobbies.push(handle.clone());
                handle
            }
        };

        info!(%connection, %addr, match_id = handle.id(), "connection accepted");
        spawn_connection(stream, connection, handle, outbound, codec);
    }
}

/// Start the reader and writer tasks for one seated connection.
///
/// `outbound` is the receiving end of the peer handed to the match.
pub fn spawn_connection(
    stream: TcpStream,
    connection: ConnectionId,
    handle: MatchHandle,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
    codec: FrameCodec,
) {
    let (mut reader, mut writer) = stream.into_split();

    tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if let Err(e) = codec.write_message(&mut writer, &message).await {
                warn!(%connection, error = %e, "write failed, closing writer");
                break;
            }
        }
        debug!(%connection, "writer stopped");
    });

    tokio::spawn(async move {
        loop {
            match codec.read_message::<ClientMessage, _>(&mut reader).await {
                Ok(Some(message)) => {
                    if handle.message(connection, message).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                // The whole frame was consumed; the stream is still in sync.
                Err(Error::Codec(e)) => warn!(%connection, error = %e, "undecodable message dropped"),
                Err(e) => {
                    warn!(%connection, error = %e, "read failed, closing connection");
                    break;
                }
            }
        }
        // The match may already be gone.
        let _ = handle.send(MatchEvent::Disconnected(connection)).await;
        debug!(%connection, "reader stopped");
    });
}
