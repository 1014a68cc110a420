//! Wire protocol tests.
//!
//! Framing of real session output, malformed input, and a full TCP round
//! trip through the listener.

mod common;

use std::time::Duration;

use ccg_server::core::{Error, MatchConfig};
use ccg_server::games::starter::*;
use ccg_server::protocol::{ClientMessage, FrameCodec, ServerMessage, LENGTH_PREFIX_BYTES};
use ccg_server::session::{MatchSession, RecordingOutbox};
use ccg_server::transport::serve;
use common::*;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

fn register(seat: u8) -> ClientMessage {
    ClientMessage::RegisterPlayer {
        net_id: net_id(seat),
        nickname: format!("player{seat}"),
        is_human: true,
        deck: vec![KNIGHT, OGRE, SCHOLAR, SHAMAN, FIREBALL, RALLY],
    }
}

/// Everything a freshly started two-player session sends.
fn opening_messages() -> Vec<ServerMessage> {
    let solver = solver_with(MatchConfig::new(2).with_seed(5));
    let mut session = MatchSession::new(solver, RecordingOutbox::new());
    session.dispatch(connection(0), register(0));
    session.dispatch(connection(1), register(1));
    session
        .outbox_mut()
        .take()
        .into_iter()
        .map(|(_, message)| message)
        .collect()
}

/// Session output survives framing unchanged, redacted views included.
#[test]
fn test_session_output_frames() {
    let codec = FrameCodec::default();
    let messages = opening_messages();
    assert!(messages.iter().any(|m| matches!(m, ServerMessage::StartGame { .. })));

    for message in &messages {
        let frame = codec.encode(message).unwrap();
        let decoded: Option<(ServerMessage, usize)> = codec.decode_frame(&frame).unwrap();
        assert_eq!(decoded, Some((message.clone(), frame.len())));
    }
}

/// Back-to-back frames in one buffer decode in order.
#[test]
fn test_concatenated_frames() {
    let codec = FrameCodec::default();
    let sent = vec![
        register(0),
        ClientMessage::FightPlayer {
            player: net_id(0),
            attacker: ccg_server::core::InstanceId(4),
        },
        ClientMessage::StopTurn,
    ];
    let mut buf = Vec::new();
    for message in &sent {
        buf.extend(codec.encode(message).unwrap());
    }

    let mut received = Vec::new();
    let mut offset = 0;
    while let Some((message, used)) = codec.decode_frame::<ClientMessage>(&buf[offset..]).unwrap() {
        received.push(message);
        offset += used;
    }

    assert_eq!(received, sent);
    assert_eq!(offset, buf.len());
}

/// Messages over the size limit are refused on both sides.
#[test]
fn test_frame_limit() {
    let codec = FrameCodec::new(16);
    let result = codec.encode(&register(0));
    assert!(matches!(result, Err(Error::FrameTooLarge { max: 16, .. })));

    let large = FrameCodec::default().encode(&register(0)).unwrap();
    let result = codec.decode_frame::<ClientMessage>(&large);
    assert!(matches!(result, Err(Error::FrameTooLarge { .. })));
}

/// A payload that isn't a message is a codec error.
#[test]
fn test_garbage_payload() {
    let codec = FrameCodec::default();
    let mut frame = 3u32.to_le_bytes().to_vec();
    frame.extend_from_slice(&[0xff, 0xff, 0xff]);
    assert_eq!(frame.len(), LENGTH_PREFIX_BYTES + 3);

    let result = codec.decode_frame::<ClientMessage>(&frame);
    assert!(matches!(result, Err(Error::Codec(_))));
}

async fn read_server(codec: &FrameCodec, stream: &mut TcpStream) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(5), codec.read_message(stream))
        .await
        .expect("timed out waiting for server")
        .unwrap()
        .expect("server closed the connection")
}

/// Two clients connect, register, and both receive StartGame.
#[tokio::test]
async fn test_tcp_match() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let solver = solver_with(MatchConfig::new(2).with_seed(9));
    let server = tokio::spawn(serve(listener, solver));

    let codec = FrameCodec::default();
    let mut first = TcpStream::connect(addr).await.unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();

    // Undecodable frames are dropped without closing the connection.
    let mut junk = 2u32.to_le_bytes().to_vec();
    junk.extend_from_slice(&[0xff, 0xff]);
    first.write_all(&junk).await.unwrap();

    codec.write_message(&mut first, &register(0)).await.unwrap();
    codec.write_message(&mut second, &register(1)).await.unwrap();

    let mut active = Vec::new();
    for (seat, stream) in [(0u8, &mut first), (1u8, &mut second)] {
        match read_server(&codec, stream).await {
            ServerMessage::StartGame {
                recipient,
                rng_seed,
                nicknames,
                ..
            } => {
                assert_eq!(recipient, net_id(seat));
                assert_eq!(rng_seed, 9);
                assert_eq!(nicknames.len(), 2);
            }
            other => panic!("expected StartGame, got {other:?}"),
        }
        loop {
            match read_server(&codec, stream).await {
                ServerMessage::PlayerDrewCards { .. } | ServerMessage::OpponentDrewCards { .. } => {}
                ServerMessage::StartTurn { is_active, turn, .. } => {
                    assert_eq!(turn, 1);
                    active.push(is_active);
                    break;
                }
                other => panic!("expected StartTurn, got {other:?}"),
            }
        }
    }
    // Seats follow registration arrival, which the two sockets race for.
    assert_eq!(active.iter().filter(|a| **a).count(), 1);

    server.abort();
}

/// A client that leaves before registering gives its seat to the next one.
#[tokio::test]
async fn test_early_disconnect_frees_seat() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let solver = solver_with(MatchConfig::new(2).with_seed(4));
    let server = tokio::spawn(serve(listener, solver));

    let leaver = TcpStream::connect(addr).await.unwrap();
    drop(leaver);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let codec = FrameCodec::default();
    let mut first = TcpStream::connect(addr).await.unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();
    codec.write_message(&mut first, &register(0)).await.unwrap();
    codec.write_message(&mut second, &register(1)).await.unwrap();

    for stream in [&mut first, &mut second] {
        let message = read_server(&codec, stream).await;
        assert!(
            matches!(message, ServerMessage::StartGame { rng_seed: 4, .. }),
            "expected StartGame, got {message:?}"
        );
    }

    server.abort();
}
