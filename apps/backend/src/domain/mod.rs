//! Domain layer: pure duel rules and helpers.

pub mod combat;
pub mod duel;
pub mod fighters;
pub mod ids;
pub mod narrator;
pub mod parts;
pub mod seed_derivation;

#[cfg(test)]
mod tests_duel;

// Re-exports for ergonomics
pub use combat::{resolve_round, RoundReport, Seat, Strike, Verdict};
pub use duel::{Departure, Duel, DuelPhase, EndReason, Expiry, Outcome, Submission};
pub use fighters::{FighterCatalog, FighterCatalogEntry, EQUIPMENT_SLOTS};
pub use ids::{MatchId, ParticipantId};
pub use parts::{Action, Part, STARTING_HEALTH};
