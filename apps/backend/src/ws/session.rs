use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::PlayerId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::protocol::Delivery;
use crate::session::SessionHandle;
use crate::state::app_state::AppState;
use crate::ws::protocol::{encode_outbound, parse_inbound, Inbound};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    session_id: Option<String>,
    player_name: Option<String>,
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(ErrorCode::MissingParameter, format!("{name} is required"))
        })
}

/// `GET /ws?sessionId=..&playerName=..`
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    params: web::Query<ConnectParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let params = params.into_inner();
    let session_id = required(params.session_id, "sessionId")?;
    let player_name = required(params.player_name, "playerName")?;

    let session = app_state.sessions.get(&session_id).ok_or_else(|| {
        AppError::not_found(
            ErrorCode::SessionNotFound,
            format!("Session {session_id} not found"),
        )
    })?;

    ws::start(WsSession::new(session, player_name), &req, stream)
}

/// One websocket connection bound to one player of one session.
pub struct WsSession {
    session: SessionHandle,
    name: String,
    joined: Option<(PlayerId, u64)>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(session: SessionHandle, name: String) -> Self {
        Self {
            session,
            name,
            joined: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    session_id = %actor.session.id(),
                    player_name = %actor.name,
                    "websocket heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Stop when this player's scope is cancelled: kicked by a newer
    /// connection, or the whole session closed.
    fn watch_cancellation(&self, cancel: CancellationToken, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.spawn(
            async move { cancel.cancelled().await }
                .into_actor(self)
                .map(|_, actor, ctx| {
                    debug!(
                        session_id = %actor.session.id(),
                        player_name = %actor.name,
                        "connection cancelled"
                    );
                    ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
                    ctx.stop();
                }),
        );
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let Some((player_id, _)) = &self.joined else {
            return;
        };

        let action = match parse_inbound(player_id, text) {
            Inbound::Action(action) => action,
            Inbound::Malformed(err) => {
                warn!(
                    session_id = %self.session.id(),
                    player_id = %player_id,
                    error = %err,
                    "ignoring malformed message"
                );
                return;
            }
            Inbound::UnknownKind(kind) => {
                warn!(
                    session_id = %self.session.id(),
                    player_id = %player_id,
                    kind = %kind,
                    "ignoring unknown message type"
                );
                return;
            }
        };

        let session = self.session.clone();
        // wait() holds further frames until this one is queued, so actions keep client order.
        ctx.wait(
            async move { session.submit(action).await }
                .into_actor(self)
                .map(|res, actor, ctx| {
                    if res.is_err() {
                        debug!(session_id = %actor.session.id(), "session closed while submitting");
                        ctx.stop();
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let conn = match self.session.join(&self.name) {
            Ok(conn) => conn,
            Err(err) => {
                warn!(
                    session_id = %self.session.id(),
                    player_name = %self.name,
                    error = %err,
                    "join refused"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
                ctx.stop();
                return;
            }
        };
        info!(
            session_id = %self.session.id(),
            player_id = %conn.player_id,
            generation = conn.generation,
            "websocket connected"
        );

        self.joined = Some((conn.player_id, conn.generation));
        ctx.add_stream(ReceiverStream::new(conn.outbox));
        self.watch_cancellation(conn.cancel, ctx);
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some((player_id, generation)) = self.joined.take() {
            self.session.leave(&player_id, generation);
            info!(session_id = %self.session.id(), player_id = %player_id, "websocket stopped");
        }
    }
}

impl StreamHandler<Delivery> for WsSession {
    fn handle(&mut self, delivery: Delivery, ctx: &mut Self::Context) {
        match encode_outbound(&delivery) {
            Ok(frame) => ctx.text(frame),
            Err(err) => {
                warn!(kind = %delivery.kind, error = %err, "failed to encode outbound message")
            }
        }
    }

    // The outbox closes once the registry drops this player.
    fn finished(&mut self, ctx: &mut Self::Context) {
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.handle_text(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                warn!(session_id = %self.session.id(), "ignoring binary frame");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    session_id = %self.session.id(),
                    player_name = %self.name,
                    error = %err,
                    "websocket protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
