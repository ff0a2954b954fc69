use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::state::PlayerId;
use crate::errors::domain::{DomainError, FaultKind};

/// Points for one round: an exact bid earns `10 + bid`, anything else nothing.
pub fn round_score(bid: Option<u8>, won: u8) -> i32 {
    match bid {
        Some(b) if b == won => 10 + i32::from(b),
        _ => 0,
    }
}

/// Per-player, per-round score history.
///
/// Every player present at game start gets a zeroed slot per round. The
/// player set and the slot count are fixed for the life of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scoreboard {
    rounds: BTreeMap<PlayerId, Vec<i32>>,
}

impl Scoreboard {
    pub fn new<'a>(players: impl IntoIterator<Item = &'a PlayerId>, max_rounds: usize) -> Self {
        Self {
            rounds: players
                .into_iter()
                .map(|p| (p.clone(), vec![0; max_rounds]))
                .collect(),
        }
    }

    /// Write `score` into the 0-based `round_index` slot for `player`.
    pub fn record(
        &mut self,
        player: &PlayerId,
        round_index: usize,
        score: i32,
    ) -> Result<(), DomainError> {
        let slots = self.rounds.get_mut(player).ok_or_else(|| {
            DomainError::fault(
                FaultKind::PlayerNotInCycle,
                format!("player {player} has no scoreboard entry"),
            )
        })?;
        let slot = slots.get_mut(round_index).ok_or_else(|| {
            DomainError::fault(
                FaultKind::InvalidRoundIndex,
                format!("round index {round_index} out of range"),
            )
        })?;
        *slot = score;
        Ok(())
    }

    pub fn round(&self, player: &PlayerId) -> Option<&[i32]> {
        self.rounds.get(player).map(Vec::as_slice)
    }

    /// Scores of every player for one round.
    pub fn round_scores(&self, round_index: usize) -> BTreeMap<PlayerId, i32> {
        self.rounds
            .iter()
            .map(|(p, slots)| (p.clone(), slots.get(round_index).copied().unwrap_or(0)))
            .collect()
    }

    pub fn totals(&self) -> BTreeMap<PlayerId, i32> {
        self.rounds
            .iter()
            .map(|(p, slots)| (p.clone(), slots.iter().sum()))
            .collect()
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.rounds.keys()
    }
}
