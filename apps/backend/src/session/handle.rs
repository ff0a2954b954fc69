use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::player::PlayerRegistry;
use crate::config::GameConfig;
use crate::domain::PlayerId;
use crate::protocol::{Action, Delivery, GameEvent, MessageKind, PlayersUpdate, Welcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,
}

/// What a connection needs after joining: its id, its private queue and
/// its own cancellation scope.
#[derive(Debug)]
pub struct PlayerConnection {
    pub player_id: PlayerId,
    pub generation: u64,
    pub outbox: mpsc::Receiver<Delivery>,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
struct Shared {
    id: String,
    registry: Arc<PlayerRegistry>,
    cancel: CancellationToken,
    inputs: mpsc::Sender<Action>,
    outgoing: mpsc::Sender<GameEvent>,
    player_queue: usize,
}

/// Cheap, cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl SessionHandle {
    pub(super) fn new(
        id: String,
        registry: Arc<PlayerRegistry>,
        cancel: CancellationToken,
        inputs: mpsc::Sender<Action>,
        outgoing: mpsc::Sender<GameEvent>,
        config: &GameConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                id,
                registry,
                cancel,
                inputs,
                outgoing,
                player_queue: config.player_queue,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    pub fn player_count(&self) -> usize {
        self.shared.registry.len()
    }

    pub fn player_names(&self) -> Vec<String> {
        self.shared.registry.names()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    /// Resolves once the session has been cancelled.
    pub async fn closed(&self) {
        self.shared.cancel.cancelled().await;
    }

    /// Add a player. A player already connected under the same id is kicked.
    pub fn join(&self, name: &str) -> Result<PlayerConnection, SessionError> {
        if self.is_cancelled() {
            return Err(SessionError::Closed);
        }

        let player_id = PlayerId::from(name);
        let (tx, outbox) = mpsc::channel(self.shared.player_queue);
        let cancel = self.shared.cancel.child_token();
        let (generation, previous) =
            self.shared
                .registry
                .insert(player_id.clone(), name, tx, cancel.clone());

        if let Some(previous) = previous {
            info!(
                session_id = %self.shared.id,
                player_id = %player_id,
                "replacing existing connection for player"
            );
            previous.cancel();
        }
        info!(session_id = %self.shared.id, player_id = %player_id, generation, "player joined");

        let welcome = Welcome {
            player_id: player_id.clone(),
            session_id: self.shared.id.clone(),
        };
        self.send_private(&player_id, MessageKind::Welcome, &welcome);
        self.broadcast_roster();

        Ok(PlayerConnection {
            player_id,
            generation,
            outbox,
            cancel,
        })
    }

    /// Drop a connection. The last player out cancels the session.
    pub fn leave(&self, player_id: &PlayerId, generation: u64) {
        let Some(remaining) = self.shared.registry.remove(player_id, generation) else {
            return;
        };
        info!(session_id = %self.shared.id, player_id = %player_id, remaining, "player left");

        if remaining == 0 {
            info!(session_id = %self.shared.id, "last player left, closing session");
            self.cancel();
        } else {
            self.broadcast_roster();
        }
    }

    /// Queue a player action for the session loop.
    pub async fn submit(&self, action: Action) -> Result<(), SessionError> {
        if self.is_cancelled() {
            return Err(SessionError::Closed);
        }
        tokio::select! {
            biased;
            _ = self.shared.cancel.cancelled() => Err(SessionError::Closed),
            sent = self.shared.inputs.send(action) => sent.map_err(|_| SessionError::Closed),
        }
    }

    /// Queue an outbound event for fan-out by the session loop.
    pub async fn emit(&self, event: GameEvent) -> Result<(), SessionError> {
        if self.is_cancelled() {
            return Err(SessionError::Closed);
        }
        tokio::select! {
            biased;
            _ = self.shared.cancel.cancelled() => Err(SessionError::Closed),
            sent = self.shared.outgoing.send(event) => sent.map_err(|_| SessionError::Closed),
        }
    }

    fn broadcast_roster(&self) {
        let roster = PlayersUpdate {
            players: self.shared.registry.names(),
        };
        match Delivery::new(MessageKind::PlayersUpdate, &roster) {
            Ok(delivery) => {
                self.shared
                    .registry
                    .deliver(&self.shared.registry.ids(), &delivery);
            }
            Err(err) => warn!(error = %err, "failed to encode players_update"),
        }
    }

    fn send_private<T: serde::Serialize>(&self, player: &PlayerId, kind: MessageKind, payload: &T) {
        match Delivery::new(kind, payload) {
            Ok(delivery) => {
                self.shared
                    .registry
                    .deliver(std::slice::from_ref(player), &delivery);
            }
            Err(err) => warn!(error = %err, %kind, "failed to encode private message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::session::SessionActor;

    fn bid(name: &str) -> Action {
        Action::new(PlayerId::from(name), MessageKind::MakeBid, Bytes::new())
    }

    #[tokio::test]
    async fn nothing_is_queued_after_cancel() {
        // The loop is never run, so the queues always have room.
        let (_actor, handle) = SessionActor::new("stopped", GameConfig::default());
        handle.cancel();

        for _ in 0..50 {
            assert_eq!(handle.submit(bid("alice")).await, Err(SessionError::Closed));
            let event = GameEvent::new(
                vec![PlayerId::from("alice")],
                MessageKind::PlayersUpdate,
                &PlayersUpdate { players: vec![] },
            )
            .unwrap();
            assert_eq!(handle.emit(event).await, Err(SessionError::Closed));
        }
    }

    #[tokio::test]
    async fn running_session_refuses_actions_once_cancelled() {
        let (actor, handle) = SessionActor::new("running", GameConfig::default());
        let task = tokio::spawn(actor.run());

        handle.submit(bid("alice")).await.unwrap();
        handle.cancel();
        assert_eq!(handle.submit(bid("alice")).await, Err(SessionError::Closed));
        task.await.unwrap();
    }
}
