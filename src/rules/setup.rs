//! Building the initial `GameState` from registrations.

use tracing::{debug, info};

use crate::cards::RuntimeCard;
use crate::core::{GameRng, GameState, PlayerId, PlayerInfo, Registration, Rejection};
use crate::effects::EffectSolver;
use crate::zones::ZonePosition;

/// Seat the registered players and deal the opening position.
///
/// Seats follow registration order. Each deck is instantiated into its
/// owner's library in list order, libraries are shuffled with the match
/// RNG, and starting hands are drawn. Deck entries without a definition are
/// reported and skipped. Events queued by the opening draws are discarded;
/// the draws stay in the history.
pub fn start_game(solver: &EffectSolver, registrations: Vec<Registration>, rng: GameRng) -> GameState {
    let config = solver.config();
    let library = &config.zone_names.library;

    let players = registrations
        .into_iter()
        .enumerate()
        .map(|(seat, registration)| PlayerInfo::new(PlayerId::new(seat as u8), registration, config))
        .collect();
    let mut state = GameState::new(players, rng);

    let seats: Vec<PlayerId> = state.player_ids().collect();
    for seat in &seats {
        let mut missing = Vec::new();
        if let Some(player) = state.player_mut(*seat) {
            let deck = player.deck.clone();
            for card_id in deck {
                let Some(definition) = solver.registry().get(card_id) else {
                    missing.push(Rejection::DefinitionNotFound { card: card_id });
                    continue;
                };
                let instance = player.alloc_instance_id();
                let card = RuntimeCard::from_definition(definition, *seat, instance);
                if let Some(zone) = player.zones.by_name_mut(library) {
                    zone.insert(card, ZonePosition::Bottom);
                }
            }
        }
        for rejection in missing {
            state.diagnostics.report(rejection);
        }

        if let Some(zone) = state.player(*seat).and_then(|p| p.zones.id_of(library)) {
            let outcome = state.shuffle_zone(*seat, zone);
            state.diagnostics.check(outcome);
        }
    }

    for seat in seats {
        let outcome = solver.draw_cards(&mut state, seat, config.starting_hand_size);
        if let Some(drawn) = state.diagnostics.check(outcome) {
            debug!(player = %seat, drawn = drawn.len(), "starting hand");
        }
    }

    state.drain_events();
    info!(players = state.player_count(), seed = state.rng_seed(), "game state built");
    state
}
