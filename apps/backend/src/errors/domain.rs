//! Domain-level error type used by the game engine and session actor.
//!
//! This error type is transport-agnostic. The session run loop decides what
//! to do with it (notify the player, log, or cancel the session) based on
//! `category()` and `is_fatal()`. HTTP handlers convert into
//! `crate::error::AppError` instead.

use std::fmt;

use thiserror::Error;

use super::error_code::ErrorCode;

/// Player-caused rejections. None of these mutate game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    // Protocol
    UnexpectedMessage,
    MalformedPayload,
    NoActiveGame,
    UnknownPlayer,
    // Turn order
    OutOfTurn,
    // Rules
    InvalidBid,
    CardNotInHand,
    MustFollowSuit,
    GameAlreadyActive,
    InvalidPlayerCount,
}

/// Engine faults: the game reached a state it cannot continue from cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FaultKind {
    EmptyCycle,
    PlayerNotInCycle,
    InvalidTransition,
    InvalidRoundIndex,
    GameCancelled,
    Encoding,
    EmptyTrick,
}

/// How the session run loop treats an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Logged and dropped.
    Protocol,
    /// Rejected with an `invalid_action` to the sender.
    Turn,
    /// Rejected with an `invalid_action` to the sender.
    Rule,
    /// Logged; fatal ones cancel the session.
    Structural,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    #[error("fault {0:?}: {1}")]
    Fault(FaultKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn fault(kind: FaultKind, detail: impl Into<String>) -> Self {
        Self::Fault(kind, detail.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::UnexpectedMessage
                | ValidationKind::MalformedPayload
                | ValidationKind::NoActiveGame
                | ValidationKind::UnknownPlayer => ErrorCategory::Protocol,
                ValidationKind::OutOfTurn => ErrorCategory::Turn,
                ValidationKind::InvalidBid
                | ValidationKind::CardNotInHand
                | ValidationKind::MustFollowSuit
                | ValidationKind::GameAlreadyActive
                | ValidationKind::InvalidPlayerCount => ErrorCategory::Rule,
            },
            DomainError::Fault(..) => ErrorCategory::Structural,
        }
    }

    /// Only an empty turn cycle ends the session; every other fault is logged.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Fault(FaultKind::EmptyCycle, _))
    }

    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d) | DomainError::Fault(_, d) => d,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::UnexpectedMessage => ErrorCode::UnexpectedMessage,
                ValidationKind::MalformedPayload => ErrorCode::MalformedPayload,
                ValidationKind::NoActiveGame => ErrorCode::NoActiveGame,
                ValidationKind::UnknownPlayer => ErrorCode::PlayerNotFound,
                ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                ValidationKind::InvalidBid => ErrorCode::InvalidBid,
                ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                ValidationKind::MustFollowSuit => ErrorCode::MustFollowSuit,
                ValidationKind::GameAlreadyActive => ErrorCode::GameAlreadyActive,
                ValidationKind::InvalidPlayerCount => ErrorCode::InvalidPlayerCount,
            },
            DomainError::Fault(..) => ErrorCode::Internal,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Turn => "turn",
            ErrorCategory::Rule => "rule",
            ErrorCategory::Structural => "structural",
        };
        f.write_str(s)
    }
}
