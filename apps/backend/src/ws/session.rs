use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web_actors::ws;
use tracing::{debug, info, warn};

use crate::domain::ParticipantId;
use crate::errors::{DomainError, ErrorCode};
use crate::protocol::{ClientMsg, ErrorView, ServerMsg};
use crate::services::Arena;
use crate::ws::hub::{Deliver, WsRegistry};

/// One WebSocket connection. Lives exactly as long as its participant.
pub struct WsSession {
    id: ParticipantId,
    arena: Arc<Arena>,
    registry: Arc<WsRegistry>,
    heartbeat_interval: Duration,
    client_timeout: Duration,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(
        id: ParticipantId,
        arena: Arc<Arena>,
        registry: Arc<WsRegistry>,
        heartbeat_interval: Duration,
        client_timeout: Duration,
    ) -> Self {
        Self {
            id,
            arena,
            registry,
            heartbeat_interval,
            client_timeout,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error(ErrorView {
                code,
                message: message.into(),
            }),
        );
    }

    fn reject(&self, ctx: &mut ws::WebsocketContext<Self>, err: DomainError) {
        debug!(conn_id = %self.id, code = %err.code(), "[WS SESSION] rejected");
        match err {
            DomainError::FighterUnavailable(name) => {
                Self::send_json(ctx, &ServerMsg::CharacterUnavailable(name));
            }
            DomainError::StaleParticipant => {
                warn!(conn_id = %self.id, "[WS SESSION] stale message");
                Self::send_json(ctx, &ServerMsg::Error(ErrorView::from(&err)));
            }
            other => Self::send_json(ctx, &ServerMsg::Error(ErrorView::from(&other))),
        }
    }

    fn dispatch(&self, cmd: ClientMsg) -> Result<(), DomainError> {
        match cmd {
            ClientMsg::SelectCharacter(name) => self.arena.select_fighter(self.id, &name),
            ClientMsg::PlayerReady => self.arena.player_ready(self.id),
            ClientMsg::PlayerAction(action) => {
                self.arena
                    .submit_action(self.id, &action.attack, &action.block)
            }
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(self.heartbeat_interval, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > actor.client_timeout {
                warn!(conn_id = %actor.id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.id, "[WS SESSION] started");
        self.registry
            .register(self.id, ctx.address().recipient::<Deliver>());
        self.arena.connect(self.id);
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.unregister(self.id);
        self.arena.disconnect(self.id);
        info!(conn_id = %self.id, "[WS SESSION] stopped");
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
                let Ok(cmd) = serde_json::from_str::<ClientMsg>(&text) else {
                    // Malformed input never tears the session down.
                    Self::send_error(ctx, ErrorCode::BadRequest, "Malformed frame");
                    return;
                };
                if let Err(err) = self.dispatch(cmd) {
                    self.reject(ctx, err);
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Deliver> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}
