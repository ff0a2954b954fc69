//! Messages exchanged between connections, the session actor and the game.
//!
//! Payloads travel as opaque JSON bytes. Only the game decodes inbound
//! payloads, and only the websocket writer wraps outbound ones in an envelope.

pub mod messages;

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

pub use messages::{
    GameEnd, GameStarted, InvalidAction, MakeBid, PlayerHand, PlayersUpdate, RoundInfo,
    RoundResult, SeatInfo, Welcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    // client -> server
    StartGame,
    MakeBid,
    PlayCard,
    // server -> client
    Welcome,
    PlayersUpdate,
    GameStarted,
    PlayerHand,
    RoundInfo,
    StateSync,
    RoundResult,
    InvalidAction,
    GameEnd,
}

impl MessageKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StartGame => "start_game",
            Self::MakeBid => "make_bid",
            Self::PlayCard => "play_card",
            Self::Welcome => "welcome",
            Self::PlayersUpdate => "players_update",
            Self::GameStarted => "game_started",
            Self::PlayerHand => "player_hand",
            Self::RoundInfo => "round_info",
            Self::StateSync => "state_sync",
            Self::RoundResult => "round_result",
            Self::InvalidAction => "invalid_action",
            Self::GameEnd => "game_end",
        }
    }

    /// Parse a kind sent by a client. Server-only kinds are not accepted.
    pub fn from_client(s: &str) -> Option<Self> {
        match s {
            "start_game" => Some(Self::StartGame),
            "make_bid" => Some(Self::MakeBid),
            "play_card" => Some(Self::PlayCard),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound player action, queued to the session actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub player_id: PlayerId,
    pub kind: MessageKind,
    pub payload: Bytes,
}

impl Action {
    pub fn new(player_id: PlayerId, kind: MessageKind, payload: impl Into<Bytes>) -> Self {
        Self {
            player_id,
            kind,
            payload: payload.into(),
        }
    }
}

/// Outbound event addressed to a set of players.
#[derive(Debug, Clone)]
pub struct GameEvent {
    pub recipients: Vec<PlayerId>,
    pub kind: MessageKind,
    pub payload: Bytes,
}

impl GameEvent {
    pub fn new<T: Serialize + ?Sized>(
        recipients: Vec<PlayerId>,
        kind: MessageKind,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            recipients,
            kind,
            payload: encode(payload)?,
        })
    }

    pub fn delivery(&self) -> Delivery {
        Delivery {
            kind: self.kind,
            payload: self.payload.clone(),
        }
    }
}

/// What a single player's writer receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub kind: MessageKind,
    pub payload: Bytes,
}

impl Delivery {
    pub fn new<T: Serialize + ?Sized>(
        kind: MessageKind,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            kind,
            payload: encode(payload)?,
        })
    }

    /// Decode the payload; handy in tests and for logging.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(payload).map(Bytes::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_match_serde() {
        for kind in [
            MessageKind::StartGame,
            MessageKind::PlayersUpdate,
            MessageKind::StateSync,
            MessageKind::InvalidAction,
            MessageKind::GameEnd,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn only_client_kinds_parse_from_client() {
        assert_eq!(MessageKind::from_client("make_bid"), Some(MessageKind::MakeBid));
        assert_eq!(MessageKind::from_client("state_sync"), None);
        assert_eq!(MessageKind::from_client("shuffle"), None);
    }

    #[test]
    fn event_payload_is_json() {
        let event = GameEvent::new(
            vec![PlayerId::from("a")],
            MessageKind::InvalidAction,
            &serde_json::json!({"message": "no"}),
        )
        .unwrap();
        let delivery = event.delivery();
        assert_eq!(delivery.kind, MessageKind::InvalidAction);
        assert_eq!(delivery.json().unwrap()["message"], "no");
    }
}
