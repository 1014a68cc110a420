//! Match phases and turn advancement.

use tracing::info;

use super::outcome::GameResult;
use crate::core::{GameState, PlayerId};
use crate::effects::EffectSolver;

/// Where a match is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchPhase {
    #[default]
    WaitingForPlayers,
    TurnInProgress(PlayerId),
    GameOver(GameResult),
}

impl MatchPhase {
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, MatchPhase::GameOver(_))
    }

    /// The turn owner, while a turn is running.
    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        match self {
            MatchPhase::TurnInProgress(p) => Some(*p),
            _ => None,
        }
    }
}

/// End the current turn and start the next one.
///
/// Runs end-of-turn processing for the outgoing player, rotates current
/// player and opponent, bumps the turn counter and runs start-of-turn
/// processing for the incoming player. Returns the new turn owner.
pub fn advance_turn(solver: &EffectSolver, state: &mut GameState) -> PlayerId {
    let previous = state.current_player();
    solver.end_turn(state);
    let next = state.rotate_turn();
    solver.start_turn(state);
    info!(turn = state.turn, from = %previous, to = %next, "turn advanced");
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_accessors() {
        assert_eq!(MatchPhase::default(), MatchPhase::WaitingForPlayers);
        assert_eq!(
            MatchPhase::TurnInProgress(PlayerId::new(1)).active_player(),
            Some(PlayerId::new(1))
        );
        assert!(MatchPhase::GameOver(GameResult::Draw).is_over());
        assert!(!MatchPhase::WaitingForPlayers.is_over());
    }
}
