//! Text-frame envelope: `{"type": <kind>, "payload": <json>}`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::domain::PlayerId;
use crate::protocol::{Action, Delivery, MessageKind};

#[derive(Debug, Deserialize)]
pub struct ClientEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

#[derive(Debug, Serialize)]
struct ServerEnvelope<'a> {
    #[serde(rename = "type")]
    kind: MessageKind,
    payload: &'a RawValue,
}

/// Why an inbound frame was dropped.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Action(Action),
    Malformed(String),
    UnknownKind(String),
}

/// Turn a text frame into an action for `player`.
pub fn parse_inbound(player: &PlayerId, text: &str) -> Inbound {
    let envelope: ClientEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(err) => return Inbound::Malformed(err.to_string()),
    };
    let Some(kind) = MessageKind::from_client(&envelope.kind) else {
        return Inbound::UnknownKind(envelope.kind);
    };
    let payload = envelope
        .payload
        .map(|raw| Bytes::from(raw.get().to_owned()))
        .unwrap_or_default();
    Inbound::Action(Action::new(player.clone(), kind, payload))
}

/// Wrap an outbound delivery into its text frame.
pub fn encode_outbound(delivery: &Delivery) -> Result<String, serde_json::Error> {
    let payload: &RawValue = serde_json::from_slice(&delivery.payload)?;
    serde_json::to_string(&ServerEnvelope {
        kind: delivery.kind,
        payload,
    })
}
