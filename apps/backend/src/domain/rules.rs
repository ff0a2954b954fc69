use std::ops::RangeInclusive;

use crate::domain::dealing::DECK_SIZE;
use crate::domain::{hand_has_suit, Card, Suit};

pub const DEFAULT_CARDS_PER_PLAYER: u8 = 7;
pub const DEFAULT_MAX_ROUNDS: u8 = 14;

pub fn valid_bid_range(hand_size: u8) -> RangeInclusive<u8> {
    0..=hand_size
}

/// Most players a single deck can serve at `cards_per_player`.
pub fn max_players(cards_per_player: u8) -> usize {
    if cards_per_player == 0 {
        return 0;
    }
    DECK_SIZE / cards_per_player as usize
}

/// Whether `card` may be played from `hand` onto `trick` (cards in play order).
///
/// The lead is the first card of the trick. A player holding the lead suit
/// or the trump suit must play one of those; a player holding neither may
/// play anything.
pub fn is_card_playable(hand: &[Card], trick: &[Card], trump: Option<Suit>, card: Card) -> bool {
    let Some(first) = trick.first() else {
        return true;
    };
    let lead = first.suit;
    let is_alternative = |c: &Card| c.suit == lead || Some(c.suit) == trump;

    if is_alternative(&card) {
        return true;
    }
    let can_follow = hand_has_suit(hand, lead) || trump.is_some_and(|t| hand_has_suit(hand, t));
    !can_follow
}

/// Sorted list of the cards in `hand` that `is_card_playable` accepts.
pub fn legal_moves(hand: &[Card], trick: &[Card], trump: Option<Suit>) -> Vec<Card> {
    let mut v: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|c| is_card_playable(hand, trick, trump, *c))
        .collect();
    v.sort();
    v
}

/// Trump is the suit of the first card played in a deal. Returns true when
/// this call assigned it.
pub fn assign_trump(trump: &mut Option<Suit>, played: Card) -> bool {
    if trump.is_some() {
        return false;
    }
    *trump = Some(played.suit);
    true
}
