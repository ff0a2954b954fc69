// Proptest generators for domain types.
// Cards drawn in one strategy are always distinct.

use proptest::prelude::*;

use crate::domain::dealing::new_deck;
use crate::domain::state::PlayerId;
use crate::domain::{Card, Rank, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

pub fn rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(Rank::ALL.to_vec())
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

/// Generate a vector of N unique cards
pub fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    Just(()).prop_perturb(move |_, mut rng| {
        let mut all_cards = new_deck();
        for i in 0..count.min(all_cards.len()) {
            let j = rng.random_range(i..all_cards.len());
            all_cards.swap(i, j);
        }
        all_cards.truncate(count);
        all_cards
    })
}

/// Generate a vector of 1 to max_count unique cards
pub fn unique_cards_up_to(max_count: usize) -> impl Strategy<Value = Vec<Card>> {
    (1..=max_count).prop_flat_map(unique_cards)
}

/// A hand plus a trick (0-6 cards) drawn from the same deck, so nothing overlaps.
pub fn hand_and_trick() -> impl Strategy<Value = (Vec<Card>, Vec<Card>)> {
    (1usize..=13, 0usize..=6).prop_flat_map(|(hand_len, trick_len)| {
        unique_cards(hand_len + trick_len).prop_map(move |mut cards| {
            let trick = cards.split_off(hand_len);
            (cards, trick)
        })
    })
}

/// Generate a hand containing no cards of the given suits
pub fn hand_without_suits(excluded: Vec<Suit>) -> impl Strategy<Value = Vec<Card>> {
    Just(()).prop_perturb(move |_, mut rng| {
        let mut cards: Vec<Card> = new_deck()
            .into_iter()
            .filter(|c| !excluded.contains(&c.suit))
            .collect();
        let count = rng.random_range(1..=13.min(cards.len()));
        for i in 0..count {
            let j = rng.random_range(i..cards.len());
            cards.swap(i, j);
        }
        cards.truncate(count);
        cards
    })
}

/// Distinct player ids "p0".."p{n-1}" for 1..=max players.
pub fn player_ids(max: usize) -> impl Strategy<Value = Vec<PlayerId>> {
    (1..=max).prop_map(|n| (0..n).map(|i| PlayerId::from(format!("p{i}"))).collect())
}

/// A trick of 1..=7 unique plays by distinct players.
pub fn trick_plays() -> impl Strategy<Value = Vec<(PlayerId, Card)>> {
    (1usize..=7).prop_flat_map(|n| {
        unique_cards(n).prop_map(|cards| {
            cards
                .into_iter()
                .enumerate()
                .map(|(i, c)| (PlayerId::from(format!("p{i}")), c))
                .collect()
        })
    })
}
