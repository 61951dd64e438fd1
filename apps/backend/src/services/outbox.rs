//! Outbound delivery seam between the arena and the transport.

use crate::domain::ParticipantId;
use crate::protocol::ServerMsg;

/// Fire-and-forget delivery to one connected participant.
///
/// Implementations must not block and must not call back into the arena.
/// Delivering to an id with no live connection is a silent no-op.
pub trait Outbox: Send + Sync {
    fn deliver(&self, to: ParticipantId, msg: ServerMsg);
}

/// A batch of messages produced by one state transition, in send order.
pub type Outbound = Vec<(ParticipantId, ServerMsg)>;

#[cfg(test)]
pub use recording::RecordingOutbox;
