//! Match rules above the effect solver: initial setup, turn sequencing and
//! win detection.

pub mod outcome;
pub mod sequencer;
pub mod setup;

pub use outcome::{check_outcome, is_alive, GameResult};
pub use sequencer::{advance_turn, MatchPhase};
pub use setup::start_game;
