//! Domain-level error type used across the arena services.
//!
//! This error type is transport-agnostic. The WebSocket layer turns it into
//! an `error` frame; HTTP handlers convert it with `From<DomainError> for AppError`.

use thiserror::Error;

use crate::errors::error_code::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Another live participant already holds this fighter.
    #[error("fighter '{0}' is already taken")]
    FighterUnavailable(String),
    #[error("unknown fighter '{0}'")]
    UnknownFighter(String),
    /// Fighter identity is immutable once chosen.
    #[error("a fighter has already been chosen")]
    FighterAlreadyChosen,
    #[error("select a fighter first")]
    FighterRequired,
    /// Second action in the same round; state is unchanged.
    #[error("action already submitted this round")]
    DuplicateSubmission,
    #[error("invalid body part '{0}'")]
    InvalidPart(String),
    #[error("not in a match")]
    NotInMatch,
    #[error("phase mismatch: {0}")]
    PhaseMismatch(String),
    /// Message from a torn-down or superseded session.
    #[error("participant session is no longer live")]
    StaleParticipant,
    #[error("opponent disconnected")]
    OpponentDisconnected,
}

impl DomainError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::FighterUnavailable(_) => ErrorCode::FighterUnavailable,
            DomainError::UnknownFighter(_) => ErrorCode::UnknownFighter,
            DomainError::FighterAlreadyChosen => ErrorCode::FighterAlreadyChosen,
            DomainError::FighterRequired => ErrorCode::FighterRequired,
            DomainError::DuplicateSubmission => ErrorCode::DuplicateSubmission,
            DomainError::InvalidPart(_) => ErrorCode::InvalidPart,
            DomainError::NotInMatch => ErrorCode::NotInMatch,
            DomainError::PhaseMismatch(_) => ErrorCode::PhaseMismatch,
            DomainError::StaleParticipant => ErrorCode::StaleParticipant,
            DomainError::OpponentDisconnected => ErrorCode::OpponentDisconnected,
        }
    }
}
