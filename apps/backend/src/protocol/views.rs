//! Payload shapes carried inside `ServerMsg` frames.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::domain::{EndReason, FighterCatalogEntry, ParticipantId, Part};
use crate::errors::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeView {
    pub participant_id: ParticipantId,
    pub protocol: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub fighter: Option<FighterCatalogEntry>,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundPlayerView {
    /// Clamped at zero.
    pub health: u32,
    pub attack: Option<Part>,
    pub block: Option<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResultView {
    pub round: u32,
    pub players: BTreeMap<ParticipantId, RoundPlayerView>,
    /// Damage received by each participant this round.
    pub damages: BTreeMap<ParticipantId, u32>,
    /// Lines written for the recipient of this frame.
    pub narration: Vec<String>,
}

/// Serialized as the winner's participant id, or the string `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Participant(ParticipantId),
    Draw,
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Winner::Participant(id) => id.serialize(serializer),
            Winner::Draw => serializer.serialize_str("draw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOverView {
    pub winner: Winner,
    pub reason: EndReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorView {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&DomainError> for ErrorView {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
