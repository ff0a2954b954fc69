//! Deck construction, shuffling and hand distribution.

use rand::Rng;
use thiserror::Error;

use crate::domain::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

pub const DECK_SIZE: usize = 52;

pub type Deck = Vec<Card>;
pub type Hand = Vec<Card>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("cannot distribute cards to zero players")]
    NoPlayers,
}

impl From<DealError> for DomainError {
    fn from(err: DealError) -> Self {
        DomainError::validation(ValidationKind::InvalidPlayerCount, err.to_string())
    }
}

/// Generate a full 52-card deck in standard order.
pub fn new_deck() -> Deck {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Fisher-Yates shuffle driven by the caller's RNG.
pub fn shuffle<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    for i in (1..deck.len()).rev() {
        let j = rng.random_range(0..=i);
        deck.swap(i, j);
    }
}

/// Split `deck` into `player_count` hands of `hand_size` cards.
///
/// Hands are cut from the front of the deck in order. When the deck is too
/// small for every player to receive `hand_size`, each hand gets
/// `deck.len() / player_count` and the last hand also takes the remainder.
pub fn distribute(
    deck: &[Card],
    player_count: usize,
    hand_size: usize,
) -> Result<Vec<Hand>, DealError> {
    if player_count == 0 {
        return Err(DealError::NoPlayers);
    }

    let fits = player_count
        .checked_mul(hand_size)
        .is_some_and(|total| total <= deck.len());
    let per_hand = if fits {
        hand_size
    } else {
        deck.len() / player_count
    };

    let mut hands = Vec::with_capacity(player_count);
    for player in 0..player_count {
        let start = player * per_hand;
        let mut end = start + per_hand;
        if !fits && player == player_count - 1 {
            end = deck.len();
        }
        hands.push(deck[start..end].to_vec());
    }
    Ok(hands)
}

/// Build, shuffle and distribute a fresh deck. Hands are sorted for display.
pub fn deal_hands<R: Rng + ?Sized>(
    rng: &mut R,
    player_count: usize,
    hand_size: usize,
) -> Result<Vec<Hand>, DealError> {
    let mut deck = new_deck();
    shuffle(&mut deck, rng);
    let mut hands = distribute(&deck, player_count, hand_size)?;
    for hand in &mut hands {
        hand.sort();
    }
    Ok(hands)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn new_deck_has_every_card_once() {
        let deck = new_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);

        for suit in Suit::ALL {
            for rank in Rank::ALL {
                assert!(unique.contains(&Card { suit, rank }));
            }
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let original = new_deck();
        let mut deck = original.clone();
        shuffle(&mut deck, &mut ChaCha20Rng::seed_from_u64(7));

        let mut sorted = deck.clone();
        sorted.sort();
        let mut expected = original.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn shuffle_differs_across_seeds() {
        let mut a = new_deck();
        let mut b = new_deck();
        shuffle(&mut a, &mut ChaCha20Rng::seed_from_u64(12345));
        shuffle(&mut b, &mut ChaCha20Rng::seed_from_u64(54321));
        assert_ne!(a, b);
        assert_ne!(a, new_deck(), "Deck order did not change after shuffle");
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let mut a = new_deck();
        let mut b = new_deck();
        shuffle(&mut a, &mut ChaCha20Rng::seed_from_u64(99));
        shuffle(&mut b, &mut ChaCha20Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn distribute_three_players_seven_each() {
        let deck = new_deck();
        let hands = distribute(&deck, 3, 7).unwrap();
        assert_eq!(hands.len(), 3);
        for hand in &hands {
            assert_eq!(hand.len(), 7);
        }

        let dealt: HashSet<Card> = hands.iter().flatten().copied().collect();
        assert_eq!(dealt.len(), 21, "no card may be repeated across hands");
        let first_21: HashSet<Card> = deck[..21].iter().copied().collect();
        assert_eq!(dealt, first_21);
    }

    #[test]
    fn distribute_remainder_goes_to_last_hand() {
        let deck = new_deck();
        // 8 players * 7 cards does not fit in 52: 6 each, last hand takes the 4 leftovers.
        let hands = distribute(&deck, 8, 7).unwrap();
        assert_eq!(hands.len(), 8);
        for hand in &hands[..7] {
            assert_eq!(hand.len(), 6);
        }
        assert_eq!(hands[7].len(), 10);
        assert_eq!(hands.iter().map(Vec::len).sum::<usize>(), DECK_SIZE);
    }

    #[test]
    fn distribute_rejects_zero_players() {
        assert_eq!(distribute(&new_deck(), 0, 7), Err(DealError::NoPlayers));
    }

    #[test]
    fn deal_hands_are_sorted_and_disjoint() {
        let hands = deal_hands(&mut ChaCha20Rng::seed_from_u64(42), 4, 7).unwrap();
        let mut seen = HashSet::new();
        for hand in &hands {
            let mut sorted = hand.clone();
            sorted.sort();
            assert_eq!(hand, &sorted);
            for card in hand {
                assert!(seen.insert(*card), "Duplicate card found");
            }
        }
    }
}
