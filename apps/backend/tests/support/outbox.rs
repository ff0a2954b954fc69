// Helpers for driving a session directly through its handle.

use std::time::Duration;

use judgement::config::GameConfig;
use judgement::domain::PlayerId;
use judgement::protocol::{Action, Delivery, MessageKind};
use judgement::session::{PlayerConnection, SessionActor, SessionHandle};
use serde_json::Value;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Start a session loop on the current runtime.
pub fn spawn_session(id: &str, config: GameConfig) -> SessionHandle {
    let (actor, handle) = SessionActor::new(id, config);
    tokio::spawn(actor.run());
    handle
}

pub fn action(player: &str, kind: MessageKind, payload: Value) -> Action {
    let bytes = if payload.is_null() {
        Vec::new()
    } else {
        serde_json::to_vec(&payload).expect("payload encodes")
    };
    Action::new(PlayerId::from(player), kind, bytes)
}

/// Next delivery for this connection, failing the test after `RECV_TIMEOUT`.
pub async fn recv(conn: &mut PlayerConnection) -> Delivery {
    tokio::time::timeout(RECV_TIMEOUT, conn.outbox.recv())
        .await
        .expect("timed out waiting for a delivery")
        .expect("outbox closed")
}

/// Skip deliveries until one of `kind` arrives; returns its decoded payload.
pub async fn recv_kind(conn: &mut PlayerConnection, kind: MessageKind) -> Value {
    loop {
        let delivery = recv(conn).await;
        if delivery.kind == kind {
            return delivery.json().expect("payload is json");
        }
    }
}

/// Everything already queued for this connection.
pub fn drain(conn: &mut PlayerConnection) -> Vec<Delivery> {
    let mut out = Vec::new();
    while let Ok(delivery) = conn.outbox.try_recv() {
        out.push(delivery);
    }
    out
}
