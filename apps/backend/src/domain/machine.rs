//! Finite state machine over game phases.
//!
//! The transition table is a fixed set of `(state, event) -> state` entries
//! resolved through a map built once at construction.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use crate::domain::state::Phase;
use crate::errors::domain::{DomainError, FaultKind};

/// Events that drive the game phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    BiddingDone,
    PlayingDone,
    PlayingContinue,
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseEvent::BiddingDone => "bidding_done",
            PhaseEvent::PlayingDone => "playing_done",
            PhaseEvent::PlayingContinue => "playing_continue",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("invalid transition: event {event} not allowed in state {state}")]
    InvalidTransition { state: String, event: String },
}

impl From<TransitionError> for DomainError {
    fn from(err: TransitionError) -> Self {
        DomainError::fault(FaultKind::InvalidTransition, err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct StateMachine<S, E> {
    current: S,
    table: HashMap<(S, E), S>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + fmt::Display,
    E: Copy + Eq + Hash + fmt::Display,
{
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            table: HashMap::new(),
        }
    }

    /// Add one table entry. Builder style; the table is not changed after construction.
    pub fn with(mut self, from: S, event: E, to: S) -> Self {
        self.table.insert((from, event), to);
        self
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn can_trigger(&self, event: E) -> bool {
        self.table.contains_key(&(self.current, event))
    }

    /// Apply `event`. Returns `(from, to)`; on error the state is unchanged.
    pub fn trigger(&mut self, event: E) -> Result<(S, S), TransitionError> {
        let from = self.current;
        let to = *self
            .table
            .get(&(from, event))
            .ok_or_else(|| TransitionError::InvalidTransition {
                state: from.to_string(),
                event: event.to_string(),
            })?;
        self.current = to;
        Ok((from, to))
    }
}

pub type GameMachine = StateMachine<Phase, PhaseEvent>;

/// Phase machine for one game, starting in `Bidding`. `GameOver` has no exits.
pub fn game_machine() -> GameMachine {
    StateMachine::new(Phase::Bidding)
        .with(Phase::Bidding, PhaseEvent::BiddingDone, Phase::Playing)
        .with(Phase::Playing, PhaseEvent::PlayingDone, Phase::Resolution)
        .with(Phase::Resolution, PhaseEvent::PlayingContinue, Phase::Bidding)
        .with(Phase::Resolution, PhaseEvent::PlayingDone, Phase::GameOver)
}
