//! Client message handlers.
//!
//! One handler per [`MessageKind`]. Each one checks authority, calls the
//! solver, tells the other players what happened, then lets the session
//! settle the state.

use super::match_session::MatchSession;
use super::outbox::Outbox;
use super::registry::HandlerRegistry;
use crate::core::{CardRef, ConnectionId, Outcome, Registration, Rejection};
use crate::protocol::{ClientMessage, MessageKind, ServerMessage};

/// Install every handler.
pub(super) fn register_all<O: Outbox>(registry: &mut HandlerRegistry<O>) {
    registry.register(MessageKind::RegisterPlayer, on_register_player);
    registry.register(MessageKind::MoveCard, on_move_card);
    registry.register(MessageKind::FightPlayer, on_fight_player);
    registry.register(MessageKind::FightCreature, on_fight_creature);
    registry.register(MessageKind::ActivateAbility, on_activate_ability);
    registry.register(MessageKind::StopTurn, on_stop_turn);
}

fn wrong_kind(kind: MessageKind) -> Rejection {
    Rejection::NoHandler {
        kind: kind.to_string(),
    }
}

fn on_register_player<O: Outbox>(
    session: &mut MatchSession<O>,
    connection: ConnectionId,
    message: ClientMessage,
) -> Outcome<()> {
    let kind = message.kind();
    let ClientMessage::RegisterPlayer {
        net_id,
        nickname,
        is_human,
        deck,
    } = message
    else {
        return Err(wrong_kind(kind));
    };

    session.register_player(Registration {
        connection,
        net_id,
        nickname,
        is_human,
        deck,
    })
}

fn on_move_card<O: Outbox>(
    session: &mut MatchSession<O>,
    connection: ConnectionId,
    message: ClientMessage,
) -> Outcome<()> {
    let kind = message.kind();
    let ClientMessage::MoveCard {
        player,
        instance,
        origin,
        destination,
        target_info,
    } = message
    else {
        return Err(wrong_kind(kind));
    };

    let seat = session.require_turn_owner(connection, Some(player))?;
    let (solver, state) = session.parts()?;
    solver.play_card(state, seat, instance, origin, destination, &target_info)?;

    session.settle(Some((CardRef::new(seat, instance), target_info)));
    Ok(())
}

fn on_fight_player<O: Outbox>(
    session: &mut MatchSession<O>,
    connection: ConnectionId,
    message: ClientMessage,
) -> Outcome<()> {
    let kind = message.kind();
    let ClientMessage::FightPlayer { player, attacker } = message else {
        return Err(wrong_kind(kind));
    };

    let seat = session.require_turn_owner(connection, Some(player))?;
    let (solver, state) = session.parts()?;
    solver.fight_player(state, CardRef::new(seat, attacker))?;

    session.broadcast_except(seat, ServerMessage::PlayerAttacked { player, attacker });
    session.settle(None);
    Ok(())
}

fn on_fight_creature<O: Outbox>(
    session: &mut MatchSession<O>,
    connection: ConnectionId,
    message: ClientMessage,
) -> Outcome<()> {
    let kind = message.kind();
    let ClientMessage::FightCreature {
        player,
        attacker,
        defender,
        attacked,
    } = message
    else {
        return Err(wrong_kind(kind));
    };

    let seat = session.require_turn_owner(connection, Some(player))?;
    let (solver, state) = session.parts()?;
    let defender_seat = state
        .player_by_net_id(defender)
        .map(|p| p.id)
        .ok_or(Rejection::PlayerNotFound)?;
    solver.fight_creature(
        state,
        CardRef::new(seat, attacker),
        CardRef::new(defender_seat, attacked),
    )?;

    session.broadcast_except(
        seat,
        ServerMessage::CreatureAttacked {
            player,
            attacker,
            defender,
            attacked,
        },
    );
    session.settle(None);
    Ok(())
}

fn on_activate_ability<O: Outbox>(
    session: &mut MatchSession<O>,
    connection: ConnectionId,
    message: ClientMessage,
) -> Outcome<()> {
    let kind = message.kind();
    let ClientMessage::ActivateAbility {
        player,
        zone,
        instance,
        ability_index,
    } = message
    else {
        return Err(wrong_kind(kind));
    };

    let seat = session.require_turn_owner(connection, Some(player))?;
    let (solver, state) = session.parts()?;
    solver.activate_ability(state, seat, zone, instance, ability_index as usize, &[])?;

    session.broadcast_except(
        seat,
        ServerMessage::ActivateAbility {
            player,
            zone,
            instance,
            ability_index,
        },
    );
    session.settle(None);
    Ok(())
}

fn on_stop_turn<O: Outbox>(
    session: &mut MatchSession<O>,
    connection: ConnectionId,
    message: ClientMessage,
) -> Outcome<()> {
    let kind = message.kind();
    if !matches!(message, ClientMessage::StopTurn) {
        return Err(wrong_kind(kind));
    }

    session.require_turn_owner(connection, None)?;
    session.advance_turn();
    Ok(())
}
