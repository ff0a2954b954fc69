use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::dealing::Hand;
use crate::domain::{Card, Suit};

/// Stable player identifier, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Players bid once each, in turn order.
    Bidding,
    /// Tricks are played until hands are empty.
    Playing,
    /// Round is scored; no player input.
    Resolution,
    /// All rounds complete. Terminal.
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Bidding => "bidding",
            Phase::Playing => "playing",
            Phase::Resolution => "resolution",
            Phase::GameOver => "gameover",
        };
        f.write_str(s)
    }
}

/// Per-game projection of a session player.
#[derive(Debug, Clone)]
pub struct GamePlayer {
    pub id: PlayerId,
    pub name: String,
    pub bid: Option<u8>,
    pub hand: Hand,
}

impl GamePlayer {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bid: None,
            hand: Vec::new(),
        }
    }
}

/// Single source of truth for one running game.
///
/// Serializes as the `state_sync` payload. Hands are never part of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// 1-based round number.
    pub round: u32,
    pub state: Phase,
    pub turn_player: PlayerId,
    /// Unset until the first card of the round is played.
    pub trump_suit: Option<Suit>,
    pub table: BTreeMap<PlayerId, Card>,
    pub bids: BTreeMap<PlayerId, u8>,
    pub hands_won: BTreeMap<PlayerId, u8>,
    /// Winner of the most recently resolved trick.
    pub last_trick_winner: Option<PlayerId>,
    /// Plays of the current trick in the order they were made.
    #[serde(skip)]
    pub trick: Vec<(PlayerId, Card)>,
}

impl GameState {
    pub fn new(turn_player: PlayerId, players: &[PlayerId]) -> Self {
        Self {
            round: 1,
            state: Phase::Bidding,
            turn_player,
            trump_suit: None,
            table: BTreeMap::new(),
            bids: BTreeMap::new(),
            hands_won: players.iter().map(|p| (p.clone(), 0)).collect(),
            last_trick_winner: None,
            trick: Vec::new(),
        }
    }

    /// Clear everything that belongs to a single deal.
    pub fn reset_for_deal(&mut self) {
        self.trump_suit = None;
        self.table.clear();
        self.trick.clear();
        self.bids.clear();
        self.last_trick_winner = None;
        for won in self.hands_won.values_mut() {
            *won = 0;
        }
    }

    /// Cards already on the table for the current trick, in play order.
    pub fn trick_cards(&self) -> Vec<Card> {
        self.trick.iter().map(|(_, c)| *c).collect()
    }
}
