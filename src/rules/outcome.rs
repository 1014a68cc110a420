//! Win/loss detection.
//!
//! A player is out once their health stat (named by
//! [`CombatConfig::player_health_stat`](crate::core::CombatConfig)) is at 0 or
//! below. Players without that stat never drop out.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, MatchConfig, PlayerId, PlayerInfo};

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Everyone left was eliminated at once.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameResult::Winner(p) => Some(*p),
            GameResult::Draw => None,
        }
    }
}

/// Whether `player` is still in the match.
#[must_use]
pub fn is_alive(player: &PlayerInfo, config: &MatchConfig) -> bool {
    player
        .stats
        .by_name(&config.combat.player_health_stat)
        .map_or(true, |s| s.effective_value() > 0)
}

/// Check whether the match has ended.
///
/// Returns `None` while two or more players are alive.
#[must_use]
pub fn check_outcome(state: &GameState, config: &MatchConfig) -> Option<GameResult> {
    let mut alive = state.players().filter(|p| is_alive(p, config)).map(|p| p.id);
    match (alive.next(), alive.next()) {
        (None, _) => Some(GameResult::Draw),
        (Some(winner), None) => Some(GameResult::Winner(winner)),
        (Some(_), Some(_)) => None,
    }
}
