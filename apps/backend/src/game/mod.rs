//! Turn-based game engine.
//!
//! A `Game` composes the deck, turn cycler, phase machine, rule engine and
//! scoreboard. It is owned and driven by a single session actor; nothing in
//! here is shared or locked.

mod events;
mod handlers;
mod host;


use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::domain::dealing::deal_hands;
use crate::domain::rules::max_players;
use crate::domain::scoring::round_score;
use crate::domain::{
    game_machine, Card, GameMachine, GamePlayer, GameState, Phase, PhaseEvent, PlayerCycler,
    PlayerId, Scoreboard,
};
use crate::errors::domain::{DomainError, FaultKind, ValidationKind};
use crate::protocol::Action;

pub use host::{GameHost, PresentPlayer};

pub struct Game {
    config: GameConfig,
    rng: ChaCha20Rng,
    players: BTreeMap<PlayerId, GamePlayer>,
    /// Seat order, fixed at game start.
    seats: Vec<PlayerId>,
    cycler: PlayerCycler,
    machine: GameMachine,
    state: GameState,
    scoreboard: Scoreboard,
    /// First turn player of the current round.
    round_opener: PlayerId,
    cancel: CancellationToken,
}

impl Game {
    /// Create a game for everyone currently present, seeded from config or the OS.
    pub fn new(host: &dyn GameHost, config: &GameConfig) -> Result<Self, DomainError> {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_os_rng(),
        };
        Self::with_rng(host, config, rng)
    }

    pub fn with_rng(
        host: &dyn GameHost,
        config: &GameConfig,
        mut rng: ChaCha20Rng,
    ) -> Result<Self, DomainError> {
        let present = host.current_players();
        let limit = max_players(config.cards_per_player);
        if present.is_empty() || present.len() > limit {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!(
                    "a game needs between 1 and {limit} players, {} present",
                    present.len()
                ),
            ));
        }

        let seats: Vec<PlayerId> = present.iter().map(|p| p.id.clone()).collect();
        let players = present
            .into_iter()
            .map(|p| (p.id.clone(), GamePlayer::new(p.id, p.name)))
            .collect();

        let first = seats[rng.random_range(0..seats.len())].clone();
        let mut cycler = PlayerCycler::new(seats.clone());
        cycler.start_from(&first)?;

        let mut game = Self {
            state: GameState::new(first.clone(), &seats),
            scoreboard: Scoreboard::new(&seats, usize::from(config.max_rounds)),
            config: config.clone(),
            rng,
            players,
            seats,
            cycler,
            machine: game_machine(),
            round_opener: first,
            cancel: host.cancellation_signal().child_token(),
        };
        game.deal()?;
        Ok(game)
    }

    /// Announce the game and the first deal.
    pub fn start(&mut self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        info!(
            players = self.seats.len(),
            first_turn = %self.state.turn_player,
            "game started"
        );
        self.broadcast_game_started(host)?;
        self.send_hands(host)?;
        self.broadcast_round_info(host)?;
        self.broadcast_state(host)
    }

    /// Validate and apply one player action. Errors leave the state untouched.
    pub fn handle_action(
        &mut self,
        action: &Action,
        host: &mut dyn GameHost,
    ) -> Result<(), DomainError> {
        if self.is_over() {
            return Err(DomainError::validation(
                ValidationKind::NoActiveGame,
                "game is over",
            ));
        }
        if self.cancel.is_cancelled() {
            return Err(DomainError::fault(
                FaultKind::GameCancelled,
                "game has been cancelled",
            ));
        }
        if !self.players.contains_key(&action.player_id) {
            return Err(DomainError::validation(
                ValidationKind::UnknownPlayer,
                format!("{} is not seated in this game", action.player_id),
            ));
        }

        match self.machine.current() {
            Phase::Bidding => self.handle_bid(action, host),
            Phase::Playing => self.handle_play(action, host),
            Phase::Resolution => self.handle_resolution(action),
            Phase::GameOver => Err(DomainError::validation(
                ValidationKind::NoActiveGame,
                "game is over",
            )),
        }
    }

    pub fn phase(&self) -> Phase {
        self.machine.current()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.machine.current() == Phase::GameOver
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn turn_order(&self) -> &PlayerCycler {
        &self.cycler
    }

    pub fn hand(&self, player: &PlayerId) -> Option<&[Card]> {
        self.players.get(player).map(|p| p.hand.as_slice())
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    #[cfg(test)]
    pub(crate) fn set_hand(&mut self, player: &PlayerId, hand: Vec<Card>) {
        if let Some(p) = self.players.get_mut(player) {
            p.hand = hand;
        }
    }

    /// Fresh shuffled deck, one hand per seat; per-deal state is cleared.
    fn deal(&mut self) -> Result<(), DomainError> {
        let hands = deal_hands(
            &mut self.rng,
            self.seats.len(),
            usize::from(self.config.cards_per_player),
        )?;
        for (id, hand) in self.seats.iter().zip(hands) {
            if let Some(player) = self.players.get_mut(id) {
                player.hand = hand;
                player.bid = None;
            }
        }
        self.state.reset_for_deal();
        debug!(round = self.state.round, "cards dealt");
        Ok(())
    }

    fn trigger(&mut self, event: PhaseEvent, host: &mut dyn GameHost) -> Result<(), DomainError> {
        let (from, to) = self.machine.trigger(event)?;
        self.state.state = to;
        info!(round = self.state.round, %from, %to, %event, "phase changed");
        self.on_phase_changed(to, host)
    }

    fn on_phase_changed(&mut self, to: Phase, host: &mut dyn GameHost) -> Result<(), DomainError> {
        match to {
            Phase::Playing => {
                self.cycler.start_from(&self.state.turn_player)?;
                self.broadcast_round_info(host)
            }
            Phase::Resolution => self.resolve_round(host),
            Phase::Bidding => self.begin_round(host),
            Phase::GameOver => {
                self.broadcast_game_end(host)?;
                self.cancel.cancel();
                info!(totals = ?self.scoreboard.totals(), "game over");
                Ok(())
            }
        }
    }

    fn resolve_round(&mut self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        let round = self.state.round;
        let index = usize::try_from(round.saturating_sub(1)).map_err(|_| {
            DomainError::fault(FaultKind::InvalidRoundIndex, format!("round {round}"))
        })?;
        for id in &self.seats {
            let won = self.state.hands_won.get(id).copied().unwrap_or(0);
            let bid = self.state.bids.get(id).copied();
            self.scoreboard.record(id, index, round_score(bid, won))?;
        }
        self.broadcast_round_result(host, round)?;

        self.state.round += 1;
        if self.state.round > u32::from(self.config.max_rounds) {
            self.trigger(PhaseEvent::PlayingDone, host)
        } else {
            self.trigger(PhaseEvent::PlayingContinue, host)
        }
    }

    fn begin_round(&mut self, host: &mut dyn GameHost) -> Result<(), DomainError> {
        self.round_opener = self.cycler.after(&self.round_opener)?;
        self.deal()?;
        self.state.turn_player = self.round_opener.clone();
        self.cycler.start_from(&self.round_opener)?;

        self.send_hands(host)?;
        self.broadcast_round_info(host)?;
        self.broadcast_state(host)
    }
}
