//! Match session tests.
//!
//! Drive a `MatchSession` through its message handlers with a recording
//! outbox and check what each connection would have been sent.

mod common;

use ccg_server::core::{CardRef, InstanceId, MatchConfig, Rejection};
use ccg_server::effects::TargetInfo;
use ccg_server::games::starter::*;
use ccg_server::protocol::{ClientMessage, MessageKind, ServerMessage};
use ccg_server::rules::{GameResult, MatchPhase};
use ccg_server::session::{MatchEvent, MatchSession, RecordingOutbox, SeatReply};
use tokio::sync::{mpsc, oneshot};
use common::*;

const SEED: u64 = 11;

fn register(seat: u8) -> ClientMessage {
    ClientMessage::RegisterPlayer {
        net_id: net_id(seat),
        nickname: format!("player{seat}"),
        is_human: true,
        deck: vec![FIRE_IMP; 10],
    }
}

fn waiting_session() -> MatchSession<RecordingOutbox> {
    let solver = solver_with(MatchConfig::new(2).with_seed(SEED));
    MatchSession::new(solver, RecordingOutbox::new())
}

/// Both players registered; player 0 is on turn 1 with 1 mana and 4 cards.
fn started_session() -> MatchSession<RecordingOutbox> {
    let mut session = waiting_session();
    session.dispatch(connection(0), register(0));
    session.dispatch(connection(1), register(1));
    session
}

fn hand_card(session: &MatchSession<RecordingOutbox>, seat: u8) -> InstanceId {
    let state = session.state().unwrap();
    let player = state.player_by_net_id(net_id(seat)).unwrap();
    player.zones.by_name("Hand").unwrap().cards()[0].instance_id
}

/// Place a card for `seat` directly, bypassing costs and triggers.
fn give(session: &mut MatchSession<RecordingOutbox>, seat: u8, card: ccg_server::cards::CardId, zone: &str) -> CardRef {
    let solver = session.solver().clone();
    let state = session.state_mut().unwrap();
    let player = state.player_by_net_id(net_id(seat)).unwrap().id;
    place(&solver, state, player, card, zone)
}

fn last_rejection(session: &MatchSession<RecordingOutbox>) -> Option<Rejection> {
    session.diagnostics().last().cloned()
}

/// The game starts once both players registered, with player 0 active.
#[test]
fn test_game_starts_when_full() {
    let mut session = waiting_session();
    session.dispatch(connection(0), register(0));
    assert_eq!(session.phase(), MatchPhase::WaitingForPlayers);
    assert_eq!(session.pending_registrations(), 1);
    assert!(session.outbox().sent.is_empty());

    session.dispatch(connection(1), register(1));

    assert_eq!(session.phase(), MatchPhase::TurnInProgress(P0));
    assert_eq!(session.timer_turn(), Some(1));
    let state = session.state().unwrap();
    assert_eq!(zone_len(state, P0, "Hand"), 4);
    assert_eq!(zone_len(state, P1, "Hand"), 3);
    assert_eq!(player_stat(state, P0, MANA), 1);
    assert_eq!(player_stat(state, P1, MANA), 0);
}

/// StartGame shows each player their own hand and only counts for the rest.
#[test]
fn test_start_game_redaction() {
    let session = started_session();

    let first = session.outbox().to(connection(0)).next().unwrap();
    let ServerMessage::StartGame {
        recipient,
        player_index,
        nicknames,
        own,
        opponents,
        rng_seed,
        turn_duration_secs,
    } = first
    else {
        panic!("expected StartGame, got {first:?}");
    };

    assert_eq!(*recipient, net_id(0));
    assert_eq!(*player_index, 0);
    assert_eq!(*rng_seed, SEED);
    assert_eq!(*turn_duration_secs, 60);
    assert_eq!(nicknames, &vec!["player0".to_string(), "player1".to_string()]);

    let hand = own.zone("Hand").unwrap();
    assert_eq!(hand.count, 3);
    assert_eq!(hand.cards.as_ref().map(Vec::len), Some(3));
    let library = own.zone("Library").unwrap();
    assert_eq!(library.count, 7);
    assert!(library.cards.is_none());

    assert_eq!(opponents.len(), 1);
    let their_hand = opponents[0].zone("Hand").unwrap();
    assert_eq!(their_hand.count, 3);
    assert!(their_hand.cards.is_none());
    assert_eq!(opponents[0].stat("Life").map(|s| s.effective), Some(20));
}

/// Opponents learn how many cards were drawn, not which.
#[test]
fn test_draw_broadcast_redacted() {
    let session = started_session();

    let own = session
        .outbox()
        .to(connection(0))
        .find_map(|m| match m {
            ServerMessage::PlayerDrewCards { player, cards } => Some((*player, cards.len())),
            _ => None,
        });
    assert_eq!(own, Some((net_id(0), 1)));

    let theirs = session
        .outbox()
        .to(connection(1))
        .find_map(|m| match m {
            ServerMessage::OpponentDrewCards { player, count } => Some((*player, *count)),
            _ => None,
        });
    assert_eq!(theirs, Some((net_id(0), 1)));
    assert!(!session
        .outbox()
        .to(connection(1))
        .any(|m| matches!(m, ServerMessage::PlayerDrewCards { .. })));
}

/// The turn draw is announced before the StartTurn snapshot that shows it,
/// and only once.
#[test]
fn test_draw_precedes_start_turn() {
    let session = started_session();

    let names: Vec<&str> = session.outbox().to(connection(0)).map(|m| m.name()).collect();
    assert_eq!(names, vec!["StartGame", "PlayerDrewCards", "StartTurn"]);

    let theirs: Vec<&str> = session.outbox().to(connection(1)).map(|m| m.name()).collect();
    assert_eq!(theirs, vec!["StartGame", "OpponentDrewCards", "StartTurn"]);
}

/// A second registration from the same connection is refused.
#[test]
fn test_duplicate_registration() {
    let mut session = waiting_session();
    session.dispatch(connection(0), register(0));
    session.dispatch(connection(0), register(0));

    assert_eq!(session.pending_registrations(), 1);
    assert_eq!(
        last_rejection(&session),
        Some(Rejection::RegistrationRefused {
            connection: connection(0)
        })
    );
}

/// A player leaving before the start frees the seat.
#[test]
fn test_disconnect_before_start() {
    let mut session = waiting_session();
    session.dispatch(connection(0), register(0));
    session.on_disconnect(connection(0));
    assert_eq!(session.pending_registrations(), 0);

    session.dispatch(connection(1), register(1));
    assert_eq!(session.phase(), MatchPhase::WaitingForPlayers);
}

fn join(session: &mut MatchSession<RecordingOutbox>, seat: u8) -> SeatReply {
    let (peer, _outbound) = mpsc::unbounded_channel();
    let (reply, mut answer) = oneshot::channel();
    session.handle_event(MatchEvent::Join {
        connection: connection(seat),
        peer,
        reply,
    });
    answer.try_recv().unwrap()
}

/// Seats are held by live connections; one freed before the start goes to
/// the next arrival.
#[test]
fn test_seats_follow_live_connections() {
    let mut session = waiting_session();
    assert_eq!(join(&mut session, 0), SeatReply::Seated);
    assert_eq!(join(&mut session, 1), SeatReply::Seated);
    assert_eq!(join(&mut session, 2), SeatReply::Full);

    session.handle_event(MatchEvent::Disconnected(connection(0)));
    assert_eq!(session.seated(), 1);
    assert_eq!(join(&mut session, 2), SeatReply::Seated);

    session.dispatch(connection(1), register(1));
    session.dispatch(connection(2), register(2));
    assert_eq!(session.phase(), MatchPhase::TurnInProgress(P0));
    assert_eq!(join(&mut session, 3), SeatReply::Closed);
}

/// Turn-scoped messages before the start are refused.
#[test]
fn test_turn_message_before_start() {
    let mut session = waiting_session();
    session.dispatch(connection(0), ClientMessage::StopTurn);
    assert_eq!(last_rejection(&session), Some(Rejection::NotStarted));
}

/// Only the turn owner may end the turn.
#[test]
fn test_stop_turn_authority() {
    let mut session = started_session();

    session.dispatch(connection(1), ClientMessage::StopTurn);
    assert_eq!(
        last_rejection(&session),
        Some(Rejection::Unauthorized {
            connection: connection(1)
        })
    );
    assert_eq!(session.state().unwrap().turn, 1);

    session.outbox_mut().take();
    session.dispatch(connection(0), ClientMessage::StopTurn);

    assert_eq!(session.phase(), MatchPhase::TurnInProgress(P1));
    let state = session.state().unwrap();
    assert_eq!(state.turn, 2);
    assert_eq!(player_stat(state, P1, MANA), 1);
    assert_eq!(zone_len(state, P1, "Hand"), 4);

    let to_p1: Vec<&str> = session.outbox().to(connection(1)).map(|m| m.name()).collect();
    assert_eq!(&to_p1[..3], &["PlayerDrewCards", "EndTurn", "StartTurn"]);
    let start = session
        .outbox()
        .to(connection(1))
        .find_map(|m| match m {
            ServerMessage::StartTurn { is_active, turn, .. } => Some((*is_active, *turn)),
            _ => None,
        });
    assert_eq!(start, Some((true, 2)));
}

/// A message claiming another player's net id is refused.
#[test]
fn test_net_id_mismatch() {
    let mut session = started_session();
    let instance = hand_card(&session, 0);
    let hand = zone_id(session.state().unwrap(), P0, "Hand");
    let board = zone_id(session.state().unwrap(), P0, "Board");
    session.outbox_mut().take();

    session.dispatch(
        connection(0),
        ClientMessage::MoveCard {
            player: net_id(1),
            instance,
            origin: hand,
            destination: board,
            target_info: TargetInfo::new(),
        },
    );

    assert!(matches!(last_rejection(&session), Some(Rejection::Unauthorized { .. })));
    assert!(session.outbox().sent.is_empty());
    assert_eq!(zone_len(session.state().unwrap(), P0, "Hand"), 4);
}

/// Playing a card broadcasts the move with the client's target info.
#[test]
fn test_play_card_broadcast() {
    let mut session = started_session();
    let instance = hand_card(&session, 0);
    let hand = zone_id(session.state().unwrap(), P0, "Hand");
    let board = zone_id(session.state().unwrap(), P0, "Board");
    session.outbox_mut().take();

    session.dispatch(
        connection(0),
        ClientMessage::MoveCard {
            player: net_id(0),
            instance,
            origin: hand,
            destination: board,
            target_info: TargetInfo::from_slice(&[7]),
        },
    );

    let state = session.state().unwrap();
    assert_eq!(player_stat(state, P0, MANA), 0);
    assert_eq!(zone_len(state, P0, "Board"), 1);

    for seat in [0, 1] {
        let moved = session
            .outbox()
            .to(connection(seat))
            .find_map(|m| match m {
                ServerMessage::CardMoved {
                    player,
                    instance: moved,
                    destination,
                    target_info,
                    card,
                    ..
                } => Some((*player, *moved, *destination, target_info.to_vec(), card.is_some())),
                _ => None,
            });
        assert_eq!(moved, Some((net_id(0), instance, board, vec![7], true)));
    }
}

/// An unaffordable ability is dropped without any broadcast.
#[test]
fn test_unaffordable_ability_is_silent() {
    let mut session = started_session();
    let shaman = give(&mut session, 0, SHAMAN, "Board");
    let board = zone_id(session.state().unwrap(), P0, "Board");
    session.outbox_mut().take();

    session.dispatch(
        connection(0),
        ClientMessage::ActivateAbility {
            player: net_id(0),
            zone: board,
            instance: shaman.instance,
            ability_index: 0,
        },
    );

    assert!(session.outbox().sent.is_empty());
    assert!(matches!(
        last_rejection(&session),
        Some(Rejection::InsufficientResources { required: 2, available: 1, .. })
    ));
    assert_eq!(card_stat(session.state().unwrap(), shaman, HEALTH), 3);
}

/// An activated ability is announced to the other players only.
#[test]
fn test_ability_broadcast() {
    let mut session = started_session();
    let shaman = give(&mut session, 0, SHAMAN, "Board");
    let board = zone_id(session.state().unwrap(), P0, "Board");
    session.outbox_mut().take();

    session.dispatch(
        connection(0),
        ClientMessage::ActivateAbility {
            player: net_id(0),
            zone: board,
            instance: shaman.instance,
            ability_index: 1,
        },
    );

    let state = session.state().unwrap();
    assert_eq!(player_stat(state, P1, LIFE), 19);
    assert_eq!(player_stat(state, P0, MANA), 0);
    assert!(session.outbox().to(connection(1)).any(|m| matches!(
        m,
        ServerMessage::ActivateAbility { ability_index: 1, .. }
    )));
    assert!(!session
        .outbox()
        .to(connection(0))
        .any(|m| matches!(m, ServerMessage::ActivateAbility { .. })));
}

/// Creature combat is announced and the dead attacker is moved.
#[test]
fn test_fight_creature_broadcast() {
    let mut session = started_session();
    let imp = give(&mut session, 0, FIRE_IMP, "Board");
    let ogre = give(&mut session, 1, OGRE, "Board");
    session.outbox_mut().take();

    session.dispatch(
        connection(0),
        ClientMessage::FightCreature {
            player: net_id(0),
            attacker: imp.instance,
            defender: net_id(1),
            attacked: ogre.instance,
        },
    );

    let state = session.state().unwrap();
    assert_eq!(zone_of(state, imp).as_deref(), Some("Graveyard"));
    assert_eq!(card_stat(state, ogre, HEALTH), 3);
    assert!(session
        .outbox()
        .to(connection(1))
        .any(|m| matches!(m, ServerMessage::CreatureAttacked { .. })));
    assert!(session
        .outbox()
        .to(connection(0))
        .any(|m| matches!(m, ServerMessage::CardMoved { instance, .. } if *instance == imp.instance)));
}

/// Fights against one's own creatures are refused without a broadcast.
#[test]
fn test_fight_own_creature_refused() {
    let mut session = started_session();
    let knight = give(&mut session, 0, KNIGHT, "Board");
    let ogre = give(&mut session, 0, OGRE, "Board");
    session.outbox_mut().take();

    for attacked in [ogre.instance, knight.instance] {
        session.dispatch(
            connection(0),
            ClientMessage::FightCreature {
                player: net_id(0),
                attacker: knight.instance,
                defender: net_id(0),
                attacked,
            },
        );
        assert!(matches!(last_rejection(&session), Some(Rejection::IllegalTarget { .. })));
    }

    let state = session.state().unwrap();
    assert_eq!(card_stat(state, ogre, HEALTH), 5);
    assert_eq!(card_stat(state, knight, HEALTH), 6);
    assert!(session.outbox().sent.is_empty());
}

/// Killing the last opponent ends the game; later messages are dropped.
#[test]
fn test_lethal_attack_ends_game() {
    let mut session = started_session();
    let knight = give(&mut session, 0, KNIGHT, "Board");
    {
        let solver = session.solver().clone();
        let state = session.state_mut().unwrap();
        set_player_stat(&solver, state, P1, LIFE, 3);
    }
    session.outbox_mut().take();

    session.dispatch(
        connection(0),
        ClientMessage::FightPlayer {
            player: net_id(0),
            attacker: knight.instance,
        },
    );

    assert_eq!(session.phase(), MatchPhase::GameOver(GameResult::Winner(P0)));
    assert!(session.is_over());
    assert_eq!(session.timer_turn(), None);
    for seat in [0, 1] {
        assert!(session.outbox().to(connection(seat)).any(|m| {
            *m == ServerMessage::EndGame {
                winner: Some(net_id(0)),
            }
        }));
    }
    assert!(session.outbox().to(connection(1)).any(|m| matches!(
        m,
        ServerMessage::PlayerAttacked { attacker, .. } if *attacker == knight.instance
    )));

    session.outbox_mut().take();
    session.dispatch(connection(0), ClientMessage::StopTurn);
    assert_eq!(last_rejection(&session), Some(Rejection::GameOver));
    assert!(session.outbox().sent.is_empty());
}

/// Messages without a registered handler are reported, not processed.
#[test]
fn test_unregistered_handler() {
    let mut session = started_session();
    assert!(session.handlers_mut().unregister(MessageKind::StopTurn).is_some());
    assert!(!session.handlers().is_registered(MessageKind::StopTurn));
    assert!(session.handlers().is_registered(MessageKind::MoveCard));

    session.dispatch(connection(0), ClientMessage::StopTurn);

    assert_eq!(
        last_rejection(&session),
        Some(Rejection::NoHandler {
            kind: "StopTurn".into()
        })
    );
    assert_eq!(session.state().unwrap().turn, 1);
}

/// Teardown removes every handler.
#[test]
fn test_teardown_clears_handlers() {
    let mut session = started_session();
    assert_eq!(session.handlers().len(), MessageKind::ALL.len());

    session.teardown();

    assert!(session.handlers().is_empty());
    session.dispatch(connection(0), ClientMessage::StopTurn);
    assert!(matches!(last_rejection(&session), Some(Rejection::NoHandler { .. })));
}
