//! Connected players and their outbound queues.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::PlayerId;
use crate::game::PresentPlayer;
use crate::protocol::Delivery;

#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    outbox: mpsc::Sender<Delivery>,
    /// Scoped to this connection; cancelled on disconnect or when kicked.
    cancel: CancellationToken,
    /// Monotonic per session; doubles as join order.
    generation: u64,
}

impl Player {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[derive(Debug, Default)]
struct Inner {
    players: HashMap<PlayerId, Player>,
    next_generation: u64,
}

/// Session player registry. Read by connection code and by the session loop.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    inner: Mutex<Inner>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player. Returns the new generation and any player that
    /// held the same id before; the caller is expected to cancel it.
    pub fn insert(
        &self,
        id: PlayerId,
        name: impl Into<String>,
        outbox: mpsc::Sender<Delivery>,
        cancel: CancellationToken,
    ) -> (u64, Option<Player>) {
        let mut inner = self.inner.lock();
        inner.next_generation += 1;
        let generation = inner.next_generation;
        let player = Player {
            id: id.clone(),
            name: name.into(),
            outbox,
            cancel,
            generation,
        };
        let previous = inner.players.insert(id, player);
        (generation, previous)
    }

    /// Remove `id` if it is still the given generation. Returns how many
    /// players remain, or `None` when a newer connection owns the id.
    pub fn remove(&self, id: &PlayerId, generation: u64) -> Option<usize> {
        let mut inner = self.inner.lock();
        match inner.players.get(id) {
            Some(p) if p.generation == generation => {
                inner.players.remove(id);
                Some(inner.players.len())
            }
            _ => None,
        }
    }

    /// Present players in join order.
    pub fn present(&self) -> Vec<PresentPlayer> {
        let inner = self.inner.lock();
        let mut players: Vec<&Player> = inner.players.values().collect();
        players.sort_by_key(|p| p.generation);
        players
            .into_iter()
            .map(|p| PresentPlayer::new(p.id.clone(), p.name.clone()))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.present().into_iter().map(|p| p.name).collect()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.present().into_iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.inner.lock().players.contains_key(id)
    }

    /// Cancel every connection scope.
    pub fn cancel_all(&self) {
        for player in self.inner.lock().players.values() {
            player.cancel();
        }
    }

    /// Non-blocking fan-out. A full queue drops this delivery for that
    /// player only. Returns how many players accepted it.
    pub fn deliver(&self, recipients: &[PlayerId], delivery: &Delivery) -> usize {
        let inner = self.inner.lock();
        let mut delivered = 0;
        for id in recipients {
            let Some(player) = inner.players.get(id) else {
                debug!(player_id = %id, kind = %delivery.kind, "recipient not connected");
                continue;
            };
            match player.outbox.try_send(delivery.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        player_id = %id,
                        kind = %delivery.kind,
                        "player queue full, dropping event"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(player_id = %id, kind = %delivery.kind, "player queue closed");
                }
            }
        }
        delivered
    }
}
