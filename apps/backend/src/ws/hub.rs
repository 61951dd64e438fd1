use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::ParticipantId;
use crate::protocol::ServerMsg;
use crate::services::Outbox;

/// One outbound frame for a session actor.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerMsg);

/// Live WebSocket sessions keyed by participant; the arena's outbox.
#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<ParticipantId, Recipient<Deliver>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: ParticipantId, recipient: Recipient<Deliver>) {
        self.connections.insert(id, recipient);
    }

    pub fn unregister(&self, id: ParticipantId) {
        self.connections.remove(&id);
    }
}

impl Outbox for WsRegistry {
    fn deliver(&self, to: ParticipantId, msg: ServerMsg) {
        match self.connections.get(&to) {
            Some(recipient) => recipient.do_send(Deliver(msg)),
            None => debug!(participant_id = %to, kind = msg.kind(), "dropped frame for closed session"),
        }
    }
}
