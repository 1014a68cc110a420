//! One match's server session.
//!
//! ## Lifecycle
//!
//! A session starts in `WaitingForPlayers`. Once `players_per_match`
//! registrations have arrived it builds the `GameState`, sends each player a
//! `StartGame` with their own view and redacted opponent views, and begins
//! player 0's turn. Turns advance on `StopTurn` from the turn owner or on
//! timer expiry. After every mutation the session destroys dead creatures,
//! broadcasts the solver's events and runs the win check; the first result
//! moves it to `GameOver` and every later message is dropped.
//!
//! ## Authority
//!
//! Every turn-scoped message is checked against the current player's
//! connection (and the net id it claims) before the solver sees it.
//! Anything refused goes through the diagnostics hook; the sender just never
//! sees a broadcast.

use tracing::{debug, info, warn};

use super::actor::{MatchEvent, SeatReply};
use super::handlers;
use super::outbox::{Outbox, Peer};
use super::registry::HandlerRegistry;
use crate::core::{
    CardRef, ConnectionId, Diagnostics, GameEvent, GameRng, GameState, MatchConfig, NetId, Outcome,
    PlayerId, Registration, Rejection,
};
use crate::effects::{EffectSolver, TargetInfo};
use crate::protocol::{CardView, ClientMessage, PlayerView, ServerMessage};
use crate::rules::{self, check_outcome, is_alive, GameResult, MatchPhase};

/// Send one message, logging a failed delivery.
fn deliver<O: Outbox>(outbox: &mut O, connection: ConnectionId, message: ServerMessage) {
    let name = message.name();
    if let Err(e) = outbox.send(connection, message) {
        warn!(%connection, message = name, error = %e, "send failed");
    }
}

/// `viewer`'s own view and its views of everyone else, in seat order.
fn views_for(state: &GameState, viewer: PlayerId) -> Option<(PlayerView, Vec<PlayerView>)> {
    let own = PlayerView::build(state.player(viewer)?, true);
    let opponents = state
        .players()
        .filter(|p| p.id != viewer)
        .map(|p| PlayerView::build(p, false))
        .collect();
    Some((own, opponents))
}

/// Server session for a single match.
pub struct MatchSession<O: Outbox> {
    solver: EffectSolver,
    outbox: O,
    handlers: HandlerRegistry<O>,
    phase: MatchPhase,
    pending: Vec<Registration>,
    /// Live connections holding a seat before the start.
    seats: Vec<ConnectionId>,
    state: Option<GameState>,
    seed: u64,
    /// Rejections before the game state exists; merged into it at start.
    diagnostics: Diagnostics,
}

impl<O: Outbox> MatchSession<O> {
    /// Create a session and register its message handlers.
    ///
    /// The RNG seed comes from the config, or from entropy when unset.
    pub fn new(solver: EffectSolver, outbox: O) -> Self {
        let seed = solver.config().seed.unwrap_or_else(rand::random);
        let mut handlers = HandlerRegistry::new();
        handlers::register_all(&mut handlers);
        Self {
            solver,
            outbox,
            handlers,
            phase: MatchPhase::WaitingForPlayers,
            pending: Vec::new(),
            seats: Vec::new(),
            state: None,
            seed,
            diagnostics: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        self.solver.config()
    }

    #[must_use]
    pub fn solver(&self) -> &EffectSolver {
        &self.solver
    }

    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    #[must_use]
    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut O {
        &mut self.outbox
    }

    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry<O> {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry<O> {
        &mut self.handlers
    }

    /// Registrations received so far (before the game starts).
    #[must_use]
    pub fn pending_registrations(&self) -> usize {
        self.pending.len()
    }

    /// Connections holding a seat while the match waits for players.
    #[must_use]
    pub fn seated(&self) -> usize {
        self.seats.len()
    }

    /// The diagnostics hook for this match.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        self.state
            .as_ref()
            .map_or(&self.diagnostics, |s| &s.diagnostics)
    }

    /// Turn the turn timer should be armed for, if any.
    #[must_use]
    pub fn timer_turn(&self) -> Option<u32> {
        match self.phase {
            MatchPhase::TurnInProgress(_) => self.state.as_ref().map(|s| s.turn),
            _ => None,
        }
    }

    // === Events ===

    /// Process one queued event.
    pub fn handle_event(&mut self, event: MatchEvent) {
        match event {
            MatchEvent::Join {
                connection,
                peer,
                reply,
            } => {
                let answer = self.join(connection, peer);
                if reply.send(answer).is_err() {
                    debug!(%connection, "seat requester went away");
                }
            }
            MatchEvent::Message {
                connection,
                message,
            } => self.dispatch(connection, message),
            MatchEvent::Disconnected(connection) => self.on_disconnect(connection),
            MatchEvent::TurnTimeout { turn } => self.on_turn_timeout(turn),
            MatchEvent::Shutdown => self.teardown(),
        }
    }

    /// Route a client message to its handler.
    pub fn dispatch(&mut self, connection: ConnectionId, message: ClientMessage) {
        let kind = message.kind();
        if self.phase.is_over() {
            self.report(Rejection::GameOver);
            return;
        }
        let Some(handler) = self.handlers.get(kind) else {
            self.report(Rejection::NoHandler {
                kind: kind.to_string(),
            });
            return;
        };

        debug!(%connection, %kind, "dispatching");
        if let Err(rejection) = handler(self, connection, message) {
            self.report(rejection);
        }
    }

    /// Seat `connection` if the match is still waiting and has room.
    pub fn join(&mut self, connection: ConnectionId, peer: Peer) -> SeatReply {
        if self.phase != MatchPhase::WaitingForPlayers {
            return SeatReply::Closed;
        }
        if self.seats.len() >= self.config().players_per_match {
            return SeatReply::Full;
        }
        self.seats.push(connection);
        self.outbox.connect(connection, peer);
        debug!(%connection, seated = self.seats.len(), "connection seated");
        SeatReply::Seated
    }

    pub fn on_disconnect(&mut self, connection: ConnectionId) {
        self.outbox.disconnect(connection);
        if self.phase == MatchPhase::WaitingForPlayers {
            self.seats.retain(|c| *c != connection);
            self.pending.retain(|r| r.connection != connection);
            info!(%connection, waiting = self.pending.len(), "player left before start");
        } else {
            info!(%connection, "player disconnected");
        }
    }

    /// Timer expiry for `turn`. Ignored unless that turn is still running.
    pub fn on_turn_timeout(&mut self, turn: u32) {
        if self.timer_turn() != Some(turn) {
            debug!(turn, "stale turn timer ignored");
            return;
        }
        info!(turn, "turn timed out");
        self.advance_turn();
    }

    /// Unregister every handler. Later messages are dropped as unhandled.
    pub fn teardown(&mut self) {
        self.handlers.clear();
        info!(phase = ?self.phase, "session torn down");
    }

    pub(super) fn report(&mut self, rejection: Rejection) {
        match self.state.as_mut() {
            Some(state) => state.diagnostics.report(rejection),
            None => self.diagnostics.report(rejection),
        }
    }

    // === Handler support ===

    /// Solver and state, once the game has started.
    pub(super) fn parts(&mut self) -> Outcome<(&EffectSolver, &mut GameState)> {
        let state = self.state.as_mut().ok_or(Rejection::NotStarted)?;
        Ok((&self.solver, state))
    }

    /// The seat of `connection` if it owns the current turn.
    ///
    /// `claimed` is the net id the message names as its sender.
    pub(super) fn require_turn_owner(
        &self,
        connection: ConnectionId,
        claimed: Option<NetId>,
    ) -> Outcome<PlayerId> {
        let active = match self.phase {
            MatchPhase::TurnInProgress(active) => active,
            MatchPhase::WaitingForPlayers => return Err(Rejection::NotStarted),
            MatchPhase::GameOver(_) => return Err(Rejection::GameOver),
        };
        let state = self.state.as_ref().ok_or(Rejection::NotStarted)?;
        let player = state.require_player(active)?;
        if player.connection != connection || claimed.is_some_and(|n| n != player.net_id) {
            return Err(Rejection::Unauthorized { connection });
        }
        Ok(active)
    }

    pub(super) fn register_player(&mut self, registration: Registration) -> Outcome<()> {
        let connection = registration.connection;
        if self.phase != MatchPhase::WaitingForPlayers
            || self.pending.iter().any(|r| r.connection == connection)
        {
            return Err(Rejection::RegistrationRefused { connection });
        }

        info!(%connection, nickname = %registration.nickname, "player registered");
        self.pending.push(registration);
        if self.pending.len() == self.config().players_per_match {
            self.start_game();
        }
        Ok(())
    }

    fn start_game(&mut self) {
        let registrations = std::mem::take(&mut self.pending);
        let mut state = rules::start_game(&self.solver, registrations, GameRng::new(self.seed));
        state.diagnostics.absorb(std::mem::take(&mut self.diagnostics));

        let nicknames: Vec<String> = state.players().map(|p| p.nickname.clone()).collect();
        let turn_duration_secs = self.config().turn_duration_secs;
        for player in state.players() {
            let Some((own, opponents)) = views_for(&state, player.id) else {
                continue;
            };
            let message = ServerMessage::StartGame {
                recipient: player.net_id,
                player_index: player.id.0,
                turn_duration_secs,
                nicknames: nicknames.clone(),
                own,
                opponents,
                rng_seed: state.rng_seed(),
            };
            deliver(&mut self.outbox, player.connection, message);
        }

        let first = state.current_player();
        info!(seed = self.seed, first = %first, "game started");
        self.solver.start_turn(&mut state);
        self.state = Some(state);
        self.phase = MatchPhase::TurnInProgress(first);

        self.flush_events(None);
        self.send_start_turn();
        self.settle(None);
    }

    /// End the current turn and start the next living player's.
    pub(super) fn advance_turn(&mut self) {
        let MatchPhase::TurnInProgress(previous) = self.phase else {
            return;
        };
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let ended = state.turn;
        let config = self.solver.config();

        let mut next = rules::advance_turn(&self.solver, state);
        for _ in 1..state.player_count() {
            if state.player(next).map_or(true, |p| is_alive(p, config)) {
                break;
            }
            next = rules::advance_turn(&self.solver, state);
        }
        self.phase = MatchPhase::TurnInProgress(next);

        // Deltas go out before the snapshots that already include them.
        self.flush_events(None);
        self.send_end_turn(previous, ended);
        self.send_start_turn();
        self.settle(None);
    }

    /// Post-mutation step: clear dead creatures, broadcast queued events,
    /// check for a winner.
    pub(super) fn settle(&mut self, primary: Option<(CardRef, TargetInfo)>) {
        if let Some(state) = self.state.as_mut() {
            self.solver.destroy_dead(state);
        }
        self.flush_events(primary);

        if self.phase.is_over() {
            return;
        }
        let result = self
            .state
            .as_ref()
            .and_then(|s| check_outcome(s, self.solver.config()));
        if let Some(result) = result {
            self.end_game(result);
        }
    }

    fn end_game(&mut self, result: GameResult) {
        self.phase = MatchPhase::GameOver(result);
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let winner = result
            .winner()
            .and_then(|p| state.player(p))
            .map(|p| p.net_id);
        info!(?winner, turn = state.turn, "game over");
        for player in state.players() {
            deliver(&mut self.outbox, player.connection, ServerMessage::EndGame { winner });
        }
    }

    // === Broadcasts ===

    /// Send `message` to every player except `acting`.
    pub(super) fn broadcast_except(&mut self, acting: PlayerId, message: ServerMessage) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        for player in state.players().filter(|p| p.id != acting) {
            deliver(&mut self.outbox, player.connection, message.clone());
        }
    }

    fn send_start_turn(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let current = state.current_player();
        for player in state.players() {
            let Some((own, opponents)) = views_for(state, player.id) else {
                continue;
            };
            let message = ServerMessage::StartTurn {
                recipient: player.net_id,
                is_active: player.id == current,
                turn: state.turn,
                own,
                opponents,
            };
            deliver(&mut self.outbox, player.connection, message);
        }
    }

    fn send_end_turn(&mut self, previous: PlayerId, turn: u32) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        for player in state.players() {
            let Some((own, opponents)) = views_for(state, player.id) else {
                continue;
            };
            let message = ServerMessage::EndTurn {
                recipient: player.net_id,
                is_active: player.id == previous,
                turn,
                own,
                opponents,
            };
            deliver(&mut self.outbox, player.connection, message);
        }
    }

    /// Broadcast the solver's queued events, redacted per recipient.
    ///
    /// `primary` attaches the client's target info to the first move of
    /// that card.
    fn flush_events(&mut self, mut primary: Option<(CardRef, TargetInfo)>) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let events = state.drain_events();
        let state = &*state;

        for event in events {
            match event {
                GameEvent::CardsDrawn { player, instances } => {
                    let Some(owner) = state.player(player) else {
                        continue;
                    };
                    let cards: Vec<CardView> = instances
                        .iter()
                        .filter_map(|i| owner.find_card(*i))
                        .map(|(_, c)| CardView::from(c))
                        .collect();
                    for recipient in state.players() {
                        let message = if recipient.id == player {
                            ServerMessage::PlayerDrewCards {
                                player: owner.net_id,
                                cards: cards.clone(),
                            }
                        } else {
                            ServerMessage::OpponentDrewCards {
                                player: owner.net_id,
                                count: instances.len() as u32,
                            }
                        };
                        deliver(&mut self.outbox, recipient.connection, message);
                    }
                }
                GameEvent::CardMoved { card, from, to } => {
                    let Some(owner) = state.player(card.owner) else {
                        continue;
                    };
                    let target_info = match primary.take() {
                        Some((c, info)) if c == card => info,
                        other => {
                            primary = other;
                            TargetInfo::new()
                        }
                    };
                    let visibility = owner.zones.get(to).map(|z| z.visibility);
                    let view = state.card(card).map(CardView::from);
                    for recipient in state.players() {
                        let visible = visibility.is_some_and(|v| v.visible_to(recipient.id == card.owner));
                        let message = ServerMessage::CardMoved {
                            player: owner.net_id,
                            instance: card.instance,
                            origin: from,
                            destination: to,
                            target_info: target_info.clone(),
                            card: if visible { view.clone() } else { None },
                        };
                        deliver(&mut self.outbox, recipient.connection, message);
                    }
                }
                GameEvent::CardCreated { card, zone } => {
                    let Some(owner) = state.player(card.owner) else {
                        continue;
                    };
                    let visibility = owner.zones.get(zone).map(|z| z.visibility);
                    let view = state.card(card).map(CardView::from);
                    for recipient in state.players() {
                        let visible = visibility.is_some_and(|v| v.visible_to(recipient.id == card.owner));
                        let message = ServerMessage::CardCreated {
                            player: owner.net_id,
                            zone,
                            instance: card.instance,
                            card: if visible { view.clone() } else { None },
                        };
                        deliver(&mut self.outbox, recipient.connection, message);
                    }
                }
            }
        }
    }
}
