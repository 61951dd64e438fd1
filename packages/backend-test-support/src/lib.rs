//! Shared helpers for the duel backend's integration tests: one-time log
//! setup plus builders and assertions for JSON wire frames and HTTP problem
//! bodies.

pub mod frames;
pub mod logging;
pub mod problem_details;
