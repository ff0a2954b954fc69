//! Per-phase action handlers.
//!
//! Every handler checks before it mutates: message kind, turn, payload, then
//! the rules. Only after all checks pass does state change, the cycler
//! advance and the phase event fire.

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{Game, GameHost};
use crate::domain::rules::{assign_trump, is_card_playable, valid_bid_range};
use crate::domain::tricks::trick_winner;
use crate::domain::{Card, PhaseEvent, PlayerId};
use crate::errors::domain::{DomainError, FaultKind, ValidationKind};
use crate::protocol::{Action, MakeBid, MessageKind};

fn expect_kind(action: &Action, expected: MessageKind) -> Result<(), DomainError> {
    if action.kind == expected {
        return Ok(());
    }
    Err(DomainError::validation(
        ValidationKind::UnexpectedMessage,
        format!("expected {expected}, got {}", action.kind),
    ))
}

fn decode<T: DeserializeOwned>(action: &Action) -> Result<T, DomainError> {
    serde_json::from_slice(&action.payload).map_err(|e| {
        DomainError::validation(
            ValidationKind::MalformedPayload,
            format!("bad {} payload: {e}", action.kind),
        )
    })
}

impl Game {
    fn expect_turn(&self, player: &PlayerId) -> Result<(), DomainError> {
        if self.state.turn_player == *player {
            return Ok(());
        }
        Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("it is {}'s turn", self.state.turn_player),
        ))
    }

    fn advance_turn(&mut self) -> Result<(), DomainError> {
        self.state.turn_player = self.cycler.next()?;
        Ok(())
    }

    pub(super) fn handle_bid(
        &mut self,
        action: &Action,
        host: &mut dyn GameHost,
    ) -> Result<(), DomainError> {
        expect_kind(action, MessageKind::MakeBid)?;
        self.expect_turn(&action.player_id)?;
        let MakeBid { bid } = decode(action)?;

        let range = valid_bid_range(self.config.cards_per_player);
        if !range.contains(&bid) {
            return Err(DomainError::validation(
                ValidationKind::InvalidBid,
                format!("bid {bid} outside {}..={}", range.start(), range.end()),
            ));
        }

        if let Some(player) = self.players.get_mut(&action.player_id) {
            player.bid = Some(bid);
        }
        self.state.bids.insert(action.player_id.clone(), bid);
        debug!(player_id = %action.player_id, bid, "bid accepted");

        self.advance_turn()?;
        if self.cycler.completed_cycle() {
            self.trigger(PhaseEvent::BiddingDone, host)?;
        }
        self.broadcast_state(host)
    }

    pub(super) fn handle_play(
        &mut self,
        action: &Action,
        host: &mut dyn GameHost,
    ) -> Result<(), DomainError> {
        expect_kind(action, MessageKind::PlayCard)?;
        self.expect_turn(&action.player_id)?;
        let card: Card = decode(action)?;

        let player = self.players.get(&action.player_id).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnknownPlayer,
                format!("{} is not seated in this game", action.player_id),
            )
        })?;
        if !player.hand.contains(&card) {
            return Err(DomainError::validation(
                ValidationKind::CardNotInHand,
                format!("{card} is not in your hand"),
            ));
        }
        let trick = self.state.trick_cards();
        if !is_card_playable(&player.hand, &trick, self.state.trump_suit, card) {
            let lead = trick.first().map(|c| c.suit);
            return Err(DomainError::validation(
                ValidationKind::MustFollowSuit,
                format!(
                    "{card} not playable: follow {lead:?} or trump {:?}",
                    self.state.trump_suit
                ),
            ));
        }

        if let Some(player) = self.players.get_mut(&action.player_id) {
            player.hand.retain(|c| *c != card);
        }
        self.state.table.insert(action.player_id.clone(), card);
        self.state.trick.push((action.player_id.clone(), card));
        if assign_trump(&mut self.state.trump_suit, card) {
            info!(round = self.state.round, trump = ?card.suit, "trump assigned");
        }
        debug!(player_id = %action.player_id, %card, "card played");

        self.send_hand(host, &action.player_id)?;
        self.advance_turn()?;
        self.broadcast_state(host)?;

        if self.cycler.completed_cycle() {
            self.finish_trick(host)?;
        }
        Ok(())
    }

    /// Inputs can only land here if a resolution step failed part way.
    pub(super) fn handle_resolution(&self, action: &Action) -> Result<(), DomainError> {
        Err(DomainError::validation(
            ValidationKind::UnexpectedMessage,
            format!("{} ignored while round {} resolves", action.kind, self.state.round),
        ))
    }

    /// Score the completed trick and hand the lead to its winner.
    fn finish_trick(&mut self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        let winner = trick_winner(&self.state.trick, self.state.trump_suit)
            .ok_or_else(|| DomainError::fault(FaultKind::EmptyTrick, "trick has no plays"))?;

        *self.state.hands_won.entry(winner.clone()).or_insert(0) += 1;
        self.state.table.clear();
        self.state.trick.clear();
        self.state.last_trick_winner = Some(winner.clone());
        self.state.turn_player = winner.clone();
        self.cycler.start_from(&winner)?;
        debug!(round = self.state.round, winner = %winner, "trick won");

        self.broadcast_state(host)?;
        if self.hands_exhausted() {
            self.trigger(PhaseEvent::PlayingDone, host)?;
        }
        Ok(())
    }

    fn hands_exhausted(&self) -> bool {
        self.players.values().all(|p| p.hand.is_empty())
    }
}
