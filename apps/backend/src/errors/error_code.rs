//! Error codes for the Judgement backend.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and appear verbatim in ProblemDetails
//! responses and in `invalid_action` payloads.

use core::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Required query parameter missing or empty
    MissingParameter,

    // Game actions
    /// Message kind not valid in the current phase
    UnexpectedMessage,
    /// Payload could not be decoded
    MalformedPayload,
    /// Game action sent with no game running
    NoActiveGame,
    /// Out of turn
    OutOfTurn,
    /// Invalid bid provided
    InvalidBid,
    /// Card not in hand
    CardNotInHand,
    /// Must follow suit
    MustFollowSuit,
    /// A game is already running in this session
    GameAlreadyActive,
    /// Too few or too many players to deal
    InvalidPlayerCount,

    // Resource not found
    /// Session not found
    SessionNotFound,
    /// Player not found
    PlayerNotFound,

    // System errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingParameter => "MISSING_PARAMETER",

            Self::UnexpectedMessage => "UNEXPECTED_MESSAGE",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::NoActiveGame => "NO_ACTIVE_GAME",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::InvalidBid => "INVALID_BID",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::MustFollowSuit => "MUST_FOLLOW_SUIT",
            Self::GameAlreadyActive => "GAME_ALREADY_ACTIVE",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",

            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
