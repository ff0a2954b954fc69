use crate::domain::state::PlayerId;
use crate::domain::{card_beats, Card, Suit};

/// Winner of a trick given its plays in order.
///
/// Highest trump wins if any trump was played, otherwise the highest card of
/// the lead suit (the first card). Returns `None` for an empty trick.
pub fn trick_winner(plays: &[(PlayerId, Card)], trump: Option<Suit>) -> Option<PlayerId> {
    let (first_player, first_card) = plays.first()?;
    let lead = first_card.suit;

    let mut best_player = first_player;
    let mut best_card = *first_card;
    for (player, card) in &plays[1..] {
        if card_beats(*card, best_card, lead, trump) {
            best_player = player;
            best_card = *card;
        }
    }
    Some(best_player.clone())
}
