//! The session run loop: the only writer of game state.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::handle::SessionHandle;
use super::player::PlayerRegistry;
use crate::config::GameConfig;
use crate::domain::PlayerId;
use crate::errors::domain::{DomainError, ErrorCategory, ValidationKind};
use crate::game::{Game, GameHost, PresentPlayer};
use crate::protocol::{Action, GameEvent, InvalidAction, MessageKind};

pub struct SessionActor {
    id: String,
    config: GameConfig,
    registry: Arc<PlayerRegistry>,
    cancel: CancellationToken,
    inputs: mpsc::Receiver<Action>,
    outgoing_tx: mpsc::Sender<GameEvent>,
    outgoing: mpsc::Receiver<GameEvent>,
    game: Option<Game>,
}

/// The actor's view of itself that a game gets to see while it runs.
struct SessionHost<'a> {
    registry: &'a PlayerRegistry,
    outgoing_tx: &'a mpsc::Sender<GameEvent>,
    outgoing: &'a mut mpsc::Receiver<GameEvent>,
    cancel: &'a CancellationToken,
}

impl GameHost for SessionHost<'_> {
    fn current_players(&self) -> Vec<PresentPlayer> {
        self.registry.present()
    }

    fn emit(&mut self, event: GameEvent) {
        match self.outgoing_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                // Only this loop drains the queue, so flush it here to keep order.
                while let Ok(pending) = self.outgoing.try_recv() {
                    self.registry.deliver(&pending.recipients, &pending.delivery());
                }
                self.registry.deliver(&event.recipients, &event.delivery());
            }
            Err(TrySendError::Closed(event)) => {
                warn!(kind = %event.kind, "outgoing queue closed, event dropped");
            }
        }
    }

    fn cancellation_signal(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl SessionActor {
    pub fn new(id: impl Into<String>, config: GameConfig) -> (Self, SessionHandle) {
        let id = id.into();
        let (inputs_tx, inputs) = mpsc::channel(config.input_queue);
        let (outgoing_tx, outgoing) = mpsc::channel(config.output_queue);
        let registry = Arc::new(PlayerRegistry::new());
        let cancel = CancellationToken::new();

        let handle = SessionHandle::new(
            id.clone(),
            Arc::clone(&registry),
            cancel.clone(),
            inputs_tx,
            outgoing_tx.clone(),
            &config,
        );
        let actor = Self {
            id,
            config,
            registry,
            cancel,
            inputs,
            outgoing_tx,
            outgoing,
            game: None,
        };
        (actor, handle)
    }

    pub async fn run(mut self) {
        info!(session_id = %self.id, "session started");

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                Some(event) = self.outgoing.recv() => {
                    self.registry.deliver(&event.recipients, &event.delivery());
                }
                input = self.inputs.recv() => match input {
                    Some(action) => self.handle_input(action),
                    None => break,
                },
            }
        }

        if let Some(game) = self.game.take() {
            game.cancellation().cancel();
        }
        self.cancel.cancel();
        self.registry.cancel_all();
        info!(session_id = %self.id, "session closed");
    }

    fn handle_input(&mut self, action: Action) {
        debug!(
            session_id = %self.id,
            player_id = %action.player_id,
            kind = %action.kind,
            "action received"
        );

        let mut host = SessionHost {
            registry: &self.registry,
            outgoing_tx: &self.outgoing_tx,
            outgoing: &mut self.outgoing,
            cancel: &self.cancel,
        };

        let result = if action.kind == MessageKind::StartGame {
            if self.game.is_some() {
                Err(DomainError::validation(
                    ValidationKind::GameAlreadyActive,
                    "a game is already running",
                ))
            } else {
                Game::new(&host, &self.config).and_then(|mut game| {
                    game.start(&mut host)?;
                    self.game = Some(game);
                    Ok(())
                })
            }
        } else if let Some(game) = self.game.as_mut() {
            game.handle_action(&action, &mut host)
        } else {
            Err(DomainError::validation(
                ValidationKind::NoActiveGame,
                format!("{} without a running game", action.kind),
            ))
        };

        if let Err(err) = result {
            self.apply_error_policy(&action, err);
        }

        if self.game.as_ref().is_some_and(Game::is_over) {
            info!(session_id = %self.id, "game finished");
            self.game = None;
        }
    }

    /// Protocol errors are logged, turn and rule errors go back to the
    /// sender, structural faults are logged and fatal ones end the session.
    fn apply_error_policy(&mut self, action: &Action, err: DomainError) {
        let player_id = &action.player_id;
        match err.category() {
            ErrorCategory::Protocol => {
                warn!(
                    session_id = %self.id,
                    player_id = %player_id,
                    kind = %action.kind,
                    error = %err,
                    "dropping action"
                );
            }
            ErrorCategory::Turn | ErrorCategory::Rule => {
                debug!(
                    session_id = %self.id,
                    player_id = %player_id,
                    kind = %action.kind,
                    error = %err,
                    "action rejected"
                );
                self.reject(player_id, &err);
            }
            ErrorCategory::Structural if err.is_fatal() => {
                error!(session_id = %self.id, error = %err, "fatal game fault, closing session");
                self.cancel.cancel();
            }
            ErrorCategory::Structural => {
                warn!(session_id = %self.id, error = %err, "game fault");
            }
        }
    }

    fn reject(&mut self, player_id: &PlayerId, err: &DomainError) {
        let payload = InvalidAction {
            code: err.code(),
            message: err.detail().to_string(),
        };
        match GameEvent::new(vec![player_id.clone()], MessageKind::InvalidAction, &payload) {
            Ok(event) => {
                let mut host = SessionHost {
                    registry: &self.registry,
                    outgoing_tx: &self.outgoing_tx,
                    outgoing: &mut self.outgoing,
                    cancel: &self.cancel,
                };
                host.emit(event);
            }
            Err(e) => warn!(error = %e, "failed to encode invalid_action"),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::errors::domain::FaultKind;

    fn setup() -> (SessionActor, SessionHandle, Action) {
        let (actor, handle) = SessionActor::new("faults", GameConfig::default());
        let action = Action::new(PlayerId::from("alice"), MessageKind::MakeBid, Bytes::new());
        (actor, handle, action)
    }

    #[test]
    fn recoverable_fault_keeps_session_open() {
        let (mut actor, handle, action) = setup();
        let err = DomainError::fault(FaultKind::InvalidTransition, "bidding after game end");
        actor.apply_error_policy(&action, err);
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn empty_cycle_closes_session() {
        let (mut actor, handle, action) = setup();
        let err = DomainError::fault(FaultKind::EmptyCycle, "no players to cycle");
        actor.apply_error_policy(&action, err);
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn rule_errors_are_sent_back_to_the_player() {
        let (mut actor, handle, action) = setup();
        let mut alice = handle.join("alice").unwrap();
        while alice.outbox.try_recv().is_ok() {}

        let err = DomainError::validation(ValidationKind::NoActiveGame, "nothing running");
        assert_eq!(err.category(), ErrorCategory::Protocol);
        actor.apply_error_policy(&action, err);
        assert!(alice.outbox.try_recv().is_err());

        let err = DomainError::validation(ValidationKind::GameAlreadyActive, "already running");
        actor.apply_error_policy(&action, err);
        // No loop is running, so the rejection is still in the session queue.
        let event = actor.outgoing.try_recv().unwrap();
        assert_eq!(event.kind, MessageKind::InvalidAction);
        assert_eq!(event.recipients, vec![PlayerId::from("alice")]);
        assert!(!handle.is_cancelled());
    }
}
