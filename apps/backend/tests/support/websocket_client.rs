// WebSocket client utilities for testing

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Join `session_id` as `player_name` on a test server.
    pub async fn join(
        addr: std::net::SocketAddr,
        session_id: &str,
        player_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::connect(&format!(
            "ws://{addr}/ws?sessionId={session_id}&playerName={player_name}"
        ))
        .await
    }

    pub async fn recv_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Message>, Box<dyn std::error::Error>> {
        tokio::time::timeout(timeout, self.stream.next())
            .await
            .map_err(|_| "Timeout waiting for message")?
            .transpose()
            .map_err(|e| e.into())
    }

    pub async fn send(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Send an envelope of `kind`, with `payload` unless it is null.
    pub async fn send_envelope(
        &mut self,
        kind: &str,
        payload: Value,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let frame = if payload.is_null() {
            json!({ "type": kind })
        } else {
            json!({ "type": kind, "payload": payload })
        };
        self.send(&frame.to_string()).await
    }

    pub async fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.close(None).await?;
        Ok(())
    }

    /// Next text frame as JSON; `None` on close or end of stream.
    pub async fn recv_json_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Value>, Box<dyn std::error::Error>> {
        loop {
            match self.recv_timeout(timeout).await? {
                Some(Message::Text(text)) => {
                    let json: Value = serde_json::from_str(text.as_str())?;
                    return Ok(Some(json));
                }
                Some(Message::Ping(_)) | Some(Message::Pong(_)) => continue,
                Some(_) | None => return Ok(None),
            }
        }
    }

    /// Skip frames until one of envelope type `kind`; returns its payload.
    pub async fn recv_type(
        &mut self,
        kind: &str,
        timeout: Duration,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        loop {
            let Some(frame) = self.recv_json_timeout(timeout).await? else {
                return Err(format!("connection closed waiting for {kind}").into());
            };
            if frame["type"] == kind {
                return Ok(frame["payload"].clone());
            }
        }
    }
}
