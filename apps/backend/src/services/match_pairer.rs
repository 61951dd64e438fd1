//! FIFO waiting pool.

use std::collections::VecDeque;

use crate::domain::ParticipantId;

#[derive(Debug, Default)]
pub struct MatchPairer {
    waiting: VecDeque<ParticipantId>,
}

impl MatchPairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` to the pool, or pair it with the earliest waiter.
    ///
    /// Returns `[earliest, id]` when a pair forms; both have left the pool.
    /// Enqueueing a participant that is already waiting changes nothing.
    pub fn enqueue(&mut self, id: ParticipantId) -> Option<[ParticipantId; 2]> {
        if self.waiting.contains(&id) {
            return None;
        }
        match self.waiting.pop_front() {
            Some(earliest) => Some([earliest, id]),
            None => {
                self.waiting.push_back(id);
                None
            }
        }
    }

    pub fn remove(&mut self, id: ParticipantId) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|w| *w != id);
        self.waiting.len() != before
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.waiting.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
