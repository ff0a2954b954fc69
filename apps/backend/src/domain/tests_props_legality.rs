//! Property-based tests for card legality, trick resolution, dealing and turn order.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::cycler::PlayerCycler;
use crate::domain::dealing::{distribute, new_deck, shuffle};
use crate::domain::rules::{is_card_playable, legal_moves};
use crate::domain::test_gens;
use crate::domain::tricks::trick_winner;
use crate::domain::{hand_has_suit, Card};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Legal plays are a non-empty, duplicate-free subset of the hand.
    #[test]
    fn prop_legal_plays_subset(
        (hand, trick) in test_gens::hand_and_trick(),
        trump in proptest::option::of(test_gens::suit()),
    ) {
        let legal = legal_moves(&hand, &trick, trump);
        prop_assert!(!legal.is_empty(), "a non-empty hand always has a legal play");

        let legal_set: HashSet<Card> = legal.iter().copied().collect();
        prop_assert_eq!(legal_set.len(), legal.len());
        for card in &legal {
            prop_assert!(hand.contains(card), "Legal play {:?} must be in hand", card);
        }
    }

    /// Holding the lead or trump suit restricts play to those suits.
    #[test]
    fn prop_must_follow_lead_or_trump(
        (hand, trick) in test_gens::hand_and_trick(),
        trump in proptest::option::of(test_gens::suit()),
    ) {
        prop_assume!(!trick.is_empty());
        let lead = trick[0].suit;
        let holds = hand_has_suit(&hand, lead) || trump.is_some_and(|t| hand_has_suit(&hand, t));

        for card in &hand {
            let follows = card.suit == lead || Some(card.suit) == trump;
            let playable = is_card_playable(&hand, &trick, trump, *card);
            if holds {
                prop_assert_eq!(
                    playable, follows,
                    "card {} lead {:?} trump {:?}", card, lead, trump
                );
            } else {
                prop_assert!(playable);
            }
        }
    }

    /// A hand void in lead and trump may play anything.
    #[test]
    fn prop_fish_hand_plays_anything(
        (lead, trump, hand, lead_rank) in (test_gens::suit(), test_gens::suit())
            .prop_flat_map(|(l, t)| {
                (Just(l), Just(t), test_gens::hand_without_suits(vec![l, t]), test_gens::rank())
            }),
    ) {
        let trick = [Card { suit: lead, rank: lead_rank }];

        let mut expected = hand.clone();
        expected.sort();
        prop_assert_eq!(legal_moves(&hand, &trick, Some(trump)), expected);
    }

    /// The trick winner is one of the players in the trick, and a trump play
    /// (when any) always wins over non-trumps.
    #[test]
    fn prop_trick_winner_in_trick(
        plays in test_gens::trick_plays(),
        trump in proptest::option::of(test_gens::suit()),
    ) {
        let winner = trick_winner(&plays, trump).unwrap();
        let (_, winning_card) = plays.iter().find(|(p, _)| *p == winner).unwrap();

        if let Some(t) = trump {
            if plays.iter().any(|(_, c)| c.suit == t) {
                prop_assert_eq!(winning_card.suit, t);
            }
        }
        let lead = plays[0].1.suit;
        prop_assert!(winning_card.suit == lead || Some(winning_card.suit) == trump);
    }

    /// Distributed hands never share a card and use the whole deck when it overflows.
    #[test]
    fn prop_distribute_disjoint(seed in any::<u64>(), players in 1usize..=10, size in 1usize..=13) {
        let mut deck = new_deck();
        shuffle(&mut deck, &mut ChaCha20Rng::seed_from_u64(seed));
        let hands = distribute(&deck, players, size).unwrap();
        prop_assert_eq!(hands.len(), players);

        let mut seen = HashSet::new();
        for hand in &hands {
            for card in hand {
                prop_assert!(seen.insert(*card), "card {} dealt twice", card);
            }
        }
        if players * size <= deck.len() {
            prop_assert!(hands.iter().all(|h| h.len() == size));
        } else {
            prop_assert_eq!(seen.len(), deck.len());
        }
    }

    /// From any starting seat, a lap completes after exactly `n` steps.
    #[test]
    fn prop_cycler_lap_length(
        ids in test_gens::player_ids(8),
        start in any::<prop::sample::Index>(),
    ) {
        let mut cycler = PlayerCycler::new(ids.clone());
        let first = ids[start.index(ids.len())].clone();
        cycler.start_from(&first).unwrap();

        let mut visited = Vec::new();
        for step in 1..=ids.len() {
            visited.push(cycler.next().unwrap());
            prop_assert_eq!(cycler.completed_cycle(), step == ids.len());
        }
        let unique: HashSet<_> = visited.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(visited.last(), Some(&first));
    }
}
