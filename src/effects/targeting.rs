//! Effect targeting.
//!
//! Targets are chosen by the client and sent as a flat list of integers
//! (`TargetInfo`) alongside `MoveCard`. Effects declare how to read it:
//!
//! - player targets read `info[0]` as a seat index
//! - card targets read `info` as `(seat, instance)` pairs
//!
//! Untargeted selectors (controller, opponents, all cards in a zone) ignore
//! the list. Entries that don't name an existing player or card are skipped.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardRef, GameState, InstanceId, PlayerId};
use crate::values::{Condition, ValueContext};

/// Client-supplied target ids.
pub type TargetInfo = SmallVec<[i32; 4]>;

/// Encode a player target.
#[must_use]
pub fn player_target_info(player: PlayerId) -> TargetInfo {
    smallvec::smallvec![player.0 as i32]
}

/// Encode card targets as `(seat, instance)` pairs.
#[must_use]
pub fn card_target_info(cards: &[CardRef]) -> TargetInfo {
    cards
        .iter()
        .flat_map(|c| [c.owner.0 as i32, c.instance.0 as i32])
        .collect()
}

/// Which players a player effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerTarget {
    Controller,
    /// The next seat in turn order.
    CurrentOpponent,
    AllOpponents,
    AllPlayers,
    /// The seat named by `info[0]`.
    Targeted,
}

/// Whose cards a zone-wide card target scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Controller,
    Opponents,
    All,
}

/// Which cards a card effect applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardTarget {
    /// The card carrying the effect.
    ThisCard,
    /// Cards named by `(seat, instance)` pairs in the target info.
    Targeted,
    /// Every card in the named zone on one side, optionally filtered. The
    /// filter is evaluated with each candidate as the context card.
    AllInZone {
        side: Side,
        zone: String,
        #[serde(default)]
        filter: Option<Condition>,
    },
}

impl PlayerTarget {
    /// Resolve to concrete seats, in seat order.
    #[must_use]
    pub fn resolve(&self, state: &GameState, ctx: &ValueContext, info: &[i32]) -> Vec<PlayerId> {
        match self {
            PlayerTarget::Controller => vec![ctx.player],
            PlayerTarget::CurrentOpponent => vec![state.opponent_of(ctx.player)],
            PlayerTarget::AllOpponents => state.player_ids().filter(|p| *p != ctx.player).collect(),
            PlayerTarget::AllPlayers => state.player_ids().collect(),
            PlayerTarget::Targeted => info
                .first()
                .and_then(|&seat| u8::try_from(seat).ok())
                .map(PlayerId::new)
                .filter(|p| state.player(*p).is_some())
                .into_iter()
                .collect(),
        }
    }
}

impl CardTarget {
    /// Resolve to cards that currently exist.
    #[must_use]
    pub fn resolve(&self, state: &GameState, ctx: &ValueContext, info: &[i32]) -> Vec<CardRef> {
        match self {
            CardTarget::ThisCard => ctx
                .card
                .filter(|card| state.card(*card).is_some())
                .into_iter()
                .collect(),
            CardTarget::Targeted => info
                .chunks_exact(2)
                .filter_map(|pair| {
                    let owner = u8::try_from(pair[0]).ok()?;
                    let instance = u32::try_from(pair[1]).ok()?;
                    Some(CardRef::new(PlayerId::new(owner), InstanceId(instance)))
                })
                .filter(|card| state.card(*card).is_some())
                .collect(),
            CardTarget::AllInZone { side, zone, filter } => {
                let players: Vec<PlayerId> = match side {
                    Side::Controller => vec![ctx.player],
                    Side::Opponents => state.player_ids().filter(|p| *p != ctx.player).collect(),
                    Side::All => state.player_ids().collect(),
                };
                players
                    .into_iter()
                    .filter_map(|p| state.player(p))
                    .filter_map(|p| p.zones.by_name(zone))
                    .flat_map(|z| z.cards().iter().map(|c| c.card_ref()))
                    .filter(|card| {
                        filter
                            .as_ref()
                            .map_or(true, |f| f.evaluate(state, &ValueContext::card(*card)))
                    })
                    .collect()
            }
        }
    }
}
