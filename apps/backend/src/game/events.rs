//! Outbound event builders.

use serde::Serialize;

use super::{Game, GameHost};
use crate::domain::PlayerId;
use crate::errors::domain::{DomainError, FaultKind};
use crate::protocol::{
    GameEnd, GameEvent, GameStarted, MessageKind, PlayerHand, RoundInfo, RoundResult, SeatInfo,
};

impl Game {
    fn emit<T: Serialize + ?Sized>(
        host: &mut dyn GameHost,
        recipients: Vec<PlayerId>,
        kind: MessageKind,
        payload: &T,
    ) -> Result<(), DomainError> {
        let event = GameEvent::new(recipients, kind, payload)
            .map_err(|e| DomainError::fault(FaultKind::Encoding, format!("{kind}: {e}")))?;
        host.emit(event);
        Ok(())
    }

    /// Broadcasts go to everyone in the session, seated or not.
    fn broadcast<T: Serialize + ?Sized>(
        host: &mut dyn GameHost,
        kind: MessageKind,
        payload: &T,
    ) -> Result<(), DomainError> {
        let recipients = host.current_players().into_iter().map(|p| p.id).collect();
        Self::emit(host, recipients, kind, payload)
    }

    pub(super) fn broadcast_game_started(
        &self,
        host: &mut dyn GameHost,
    ) -> Result<(), DomainError> {
        let players = self
            .seats
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| SeatInfo {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();
        let payload = GameStarted {
            players,
            max_rounds: self.config.max_rounds,
            cards_per_player: self.config.cards_per_player,
        };
        Self::broadcast(host, MessageKind::GameStarted, &payload)
    }

    pub(super) fn broadcast_state(&self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        Self::broadcast(host, MessageKind::StateSync, &self.state)
    }

    pub(super) fn broadcast_round_info(&self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        let turn = &self.state.turn_player;
        let payload = RoundInfo {
            round: self.state.round,
            turn_player: self
                .players
                .get(turn)
                .map_or_else(|| turn.to_string(), |p| p.name.clone()),
            turn_player_id: turn.clone(),
            state: self.state.state,
            trump_suit: self.state.trump_suit,
        };
        Self::broadcast(host, MessageKind::RoundInfo, &payload)
    }

    pub(super) fn broadcast_round_result(
        &self,
        host: &mut dyn GameHost,
        round: u32,
    ) -> Result<(), DomainError> {
        let index = usize::try_from(round.saturating_sub(1)).unwrap_or(usize::MAX);
        let payload = RoundResult {
            round,
            scores: self.scoreboard.round_scores(index),
            totals: self.scoreboard.totals(),
        };
        Self::broadcast(host, MessageKind::RoundResult, &payload)
    }

    pub(super) fn broadcast_game_end(&self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        let scores = self
            .scoreboard
            .players()
            .filter_map(|id| self.scoreboard.round(id).map(|r| (id.clone(), r.to_vec())))
            .collect();
        let payload = GameEnd {
            scores,
            totals: self.scoreboard.totals(),
        };
        Self::broadcast(host, MessageKind::GameEnd, &payload)
    }

    /// Each player's hand goes only to that player.
    pub(super) fn send_hands(&self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        for id in &self.seats {
            self.send_hand(host, id)?;
        }
        Ok(())
    }

    pub(super) fn send_hand(
        &self,
        host: &mut dyn GameHost,
        player: &PlayerId,
    ) -> Result<(), DomainError> {
        let Some(p) = self.players.get(player) else {
            return Ok(());
        };
        let payload = PlayerHand {
            cards: p.hand.clone(),
        };
        Self::emit(host, vec![player.clone()], MessageKind::PlayerHand, &payload)
    }
}
