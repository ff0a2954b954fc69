use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use tracing::info;

use super::actor::SessionActor;
use super::handle::SessionHandle;
use crate::config::GameConfig;

pub const SESSION_ID_LEN: usize = 8;

/// Live sessions by id. Sessions remove themselves when their loop exits.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
    config: GameConfig,
}

impl SessionStore {
    pub fn new(config: GameConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    /// Spawn a new session actor under a fresh id. Must run inside a tokio runtime.
    pub fn create(self: &Arc<Self>) -> SessionHandle {
        loop {
            let id = random_session_id();
            let Entry::Vacant(slot) = self.sessions.entry(id.clone()) else {
                continue;
            };

            let (actor, handle) = SessionActor::new(id.clone(), self.config.clone());
            slot.insert(handle.clone());

            let store = Arc::clone(self);
            tokio::spawn(async move {
                actor.run().await;
                store.sessions.remove(&id);
                info!(session_id = %id, live = store.sessions.len(), "session removed");
            });
            tokio::spawn(reap_if_idle(handle.clone(), self.config.idle_session()));

            info!(session_id = %handle.id(), live = self.sessions.len(), "session created");
            return handle;
        }
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Remove and cancel a session.
    pub fn remove(&self, id: &str) -> Option<SessionHandle> {
        let (_, handle) = self.sessions.remove(id)?;
        handle.cancel();
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Sessions close when their last player leaves, which never happens to one
/// nobody joined. Cancel those once the idle window has passed.
async fn reap_if_idle(handle: SessionHandle, idle: Duration) {
    tokio::select! {
        _ = handle.closed() => {}
        _ = tokio::time::sleep(idle) => {
            if handle.player_count() == 0 {
                info!(session_id = %handle.id(), "no players joined, closing idle session");
                handle.cancel();
            }
        }
    }
}

fn random_session_id() -> String {
    let mut rng = rand::rng();
    (0..SESSION_ID_LEN)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect()
}
