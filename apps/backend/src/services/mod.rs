//! Game services: session registry, match pairer, round coordinators, and the
//! `Arena` that serializes them.

pub mod arena;
pub mod match_pairer;
pub mod outbox;
pub mod round_coordinator;
pub mod session_registry;

#[cfg(test)]
mod tests_arena;

pub use arena::{Arena, ArenaSettings, ArenaStats};
pub use outbox::Outbox;
