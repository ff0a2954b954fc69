//! Payload shapes for each message kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Card, Phase, PlayerId, Suit};
use crate::errors::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeBid {
    pub bid: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub player_id: PlayerId,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayersUpdate {
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatInfo {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStarted {
    pub players: Vec<SeatInfo>,
    pub max_rounds: u8,
    pub cards_per_player: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerHand {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    pub round: u32,
    /// Display name of the player on turn.
    pub turn_player: String,
    pub turn_player_id: PlayerId,
    pub state: Phase,
    pub trump_suit: Option<Suit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub scores: BTreeMap<PlayerId, i32>,
    pub totals: BTreeMap<PlayerId, i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameEnd {
    pub scores: BTreeMap<PlayerId, Vec<i32>>,
    pub totals: BTreeMap<PlayerId, i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvalidAction {
    pub code: ErrorCode,
    pub message: String,
}
