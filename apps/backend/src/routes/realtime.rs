use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;

use crate::domain::ParticipantId;
use crate::state::app_state::AppState;
use crate::ws::WsSession;

/// Upgrade to a WebSocket; each connection is a fresh participant.
async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(
        ParticipantId::new(),
        app_state.arena.clone(),
        app_state.connections.clone(),
        app_state.config.heartbeat_interval,
        app_state.config.client_timeout(),
    );
    ws::start(session, &req, stream)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(upgrade));
}
