//! The single reporting point for silently dropped operations.
//!
//! Clients never receive an error message: a rejected request simply produces
//! no broadcast. Every place that drops a request or aborts an action calls
//! [`Diagnostics::report`], which emits a `tracing` event and keeps the most
//! recent rejections so tests can assert on them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{CardRef, ConnectionId, InstanceId};
use super::player::PlayerId;
use super::stat::StatId;
use crate::cards::CardId;

/// How many rejections are retained.
pub const DIAGNOSTICS_CAPACITY: usize = 64;

/// Why an operation was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Rejection {
    /// The connection is not allowed to perform this action right now.
    #[error("unauthorized: {connection}")]
    Unauthorized { connection: ConnectionId },
    /// A message arrived for a message kind with no registered handler.
    #[error("no handler for {kind}")]
    NoHandler { kind: String },
    /// The match already ended.
    #[error("game over")]
    GameOver,
    /// The match has not started yet.
    #[error("match not started")]
    NotStarted,
    /// Registration rejected (duplicate connection or match full).
    #[error("registration refused for {connection}")]
    RegistrationRefused { connection: ConnectionId },
    #[error("player not found")]
    PlayerNotFound,
    #[error("card {instance} of {owner} not found")]
    CardNotFound { owner: PlayerId, instance: InstanceId },
    /// The target is not one the acting card may fight.
    #[error("{target} is not a legal target for {card}")]
    IllegalTarget { card: CardRef, target: CardRef },
    #[error("zone '{zone}' not found")]
    ZoneNotFound { zone: String },
    #[error("{stat} not found")]
    StatNotFound { stat: StatId },
    #[error("stat '{name}' not found")]
    StatNameNotFound { name: String },
    #[error("{card} not in registry")]
    DefinitionNotFound { card: CardId },
    #[error("card '{name}' not in registry")]
    DefinitionNameNotFound { name: String },
    #[error("ability {index} of {card} not found")]
    AbilityNotFound { card: CardRef, index: usize },
    /// A cost could not be paid.
    #[error("{stat} needs {required} but has {available}")]
    InsufficientResources { stat: StatId, required: i64, available: i64 },
    /// The destination zone is at capacity.
    #[error("zone '{zone}' is full")]
    ZoneFull { zone: String },
    /// Nested triggers exceeded the depth limit.
    #[error("trigger depth {depth} exceeded")]
    RecursionLimit { depth: usize },
}

/// Outcome of a rule-level operation.
pub type Outcome<T = ()> = std::result::Result<T, Rejection>;

/// Bounded rejection log.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    recent: VecDeque<Rejection>,
    total: u64,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dropped operation.
    pub fn report(&mut self, rejection: Rejection) {
        tracing::warn!(reason = %rejection, "operation dropped");
        if self.recent.len() == DIAGNOSTICS_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(rejection);
        self.total += 1;
    }

    /// Record the error side of an outcome, passing successes through.
    pub fn check<T>(&mut self, outcome: Outcome<T>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(rejection) => {
                self.report(rejection);
                None
            }
        }
    }

    /// Most recent rejections, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &Rejection> {
        self.recent.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Rejection> {
        self.recent.back()
    }

    /// Total rejections since the match began.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    /// Append another log's entries without reporting them again.
    pub fn absorb(&mut self, other: Diagnostics) {
        for rejection in other.recent {
            if self.recent.len() == DIAGNOSTICS_CAPACITY {
                self.recent.pop_front();
            }
            self.recent.push_back(rejection);
        }
        self.total += other.total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_and_last() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Rejection::GameOver);
        diagnostics.report(Rejection::PlayerNotFound);

        assert_eq!(diagnostics.total(), 2);
        assert_eq!(diagnostics.last(), Some(&Rejection::PlayerNotFound));
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut diagnostics = Diagnostics::new();
        for _ in 0..DIAGNOSTICS_CAPACITY + 5 {
            diagnostics.report(Rejection::NotStarted);
        }
        assert_eq!(diagnostics.recent().count(), DIAGNOSTICS_CAPACITY);
        assert_eq!(diagnostics.total(), (DIAGNOSTICS_CAPACITY + 5) as u64);
    }

    #[test]
    fn test_check_passes_success() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.check(Ok::<_, Rejection>(3)), Some(3));
        assert_eq!(diagnostics.check::<u32>(Err(Rejection::GameOver)), None);
        assert_eq!(diagnostics.total(), 1);
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::InsufficientResources {
            stat: StatId::new(1),
            required: 3,
            available: 1,
        };
        assert_eq!(rejection.to_string(), "Stat(1) needs 3 but has 1");

        let card = CardRef::new(PlayerId::new(0), InstanceId(2));
        let rejection = Rejection::IllegalTarget { card, target: card };
        assert!(rejection.to_string().contains("not a legal target"));
    }
}
