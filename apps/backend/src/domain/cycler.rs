//! Circular turn order over the players of a game.
//!
//! The cycler only knows the seat order. Where a lap starts is decided by the
//! game (trick leader, rotating round opener) through `start_from`.

use thiserror::Error;

use crate::domain::state::PlayerId;
use crate::errors::domain::{DomainError, FaultKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CyclerError {
    #[error("player {0} not found in turn order")]
    NotFound(PlayerId),
    #[error("0 players to cycle through")]
    EmptyCycle,
}

impl From<CyclerError> for DomainError {
    fn from(err: CyclerError) -> Self {
        match err {
            CyclerError::NotFound(_) => {
                DomainError::fault(FaultKind::PlayerNotInCycle, err.to_string())
            }
            CyclerError::EmptyCycle => DomainError::fault(FaultKind::EmptyCycle, err.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerCycler {
    keys: Vec<PlayerId>,
    index: usize,
    start_index: usize,
    advanced: bool,
}

impl PlayerCycler {
    pub fn new(keys: Vec<PlayerId>) -> Self {
        Self {
            keys,
            index: 0,
            start_index: 0,
            advanced: false,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[PlayerId] {
        &self.keys
    }

    /// Player at the current position, if any.
    pub fn current(&self) -> Option<&PlayerId> {
        self.keys.get(self.index)
    }

    /// Re-seed the lap at `player`; the next completed lap ends back on them.
    pub fn start_from(&mut self, player: &PlayerId) -> Result<(), CyclerError> {
        let pos = self
            .keys
            .iter()
            .position(|id| id == player)
            .ok_or_else(|| CyclerError::NotFound(player.clone()))?;
        self.index = pos;
        self.start_index = pos;
        self.advanced = false;
        Ok(())
    }

    /// Move one seat forward and return the player now on turn.
    pub fn next(&mut self) -> Result<PlayerId, CyclerError> {
        if self.keys.is_empty() {
            return Err(CyclerError::EmptyCycle);
        }
        self.index = (self.index + 1) % self.keys.len();
        self.advanced = true;
        Ok(self.keys[self.index].clone())
    }

    /// True once a full lap has been walked since the last `start_from`.
    pub fn completed_cycle(&self) -> bool {
        !self.keys.is_empty() && self.advanced && self.index == self.start_index
    }

    /// Seat following `player` in turn order, without moving the cycler.
    pub fn after(&self, player: &PlayerId) -> Result<PlayerId, CyclerError> {
        if self.keys.is_empty() {
            return Err(CyclerError::EmptyCycle);
        }
        let pos = self
            .keys
            .iter()
            .position(|id| id == player)
            .ok_or_else(|| CyclerError::NotFound(player.clone()))?;
        Ok(self.keys[(pos + 1) % self.keys.len()].clone())
    }
}
