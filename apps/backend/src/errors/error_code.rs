//! Error codes for the duel server.
//!
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear
//! in WebSocket `error` frames and HTTP problem details.
//! Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Selection
    /// Fighter is reserved by another live participant
    FighterUnavailable,
    /// Fighter name is not in the catalog
    UnknownFighter,
    /// Participant already holds a fighter
    FighterAlreadyChosen,
    /// Readiness requires a fighter
    FighterRequired,

    // Rounds
    /// Second submission in one round
    DuplicateSubmission,
    /// Attack or block names an unknown part
    InvalidPart,
    /// Participant is not paired
    NotInMatch,
    /// Match is not in the required phase
    PhaseMismatch,

    // Sessions
    /// Message from a torn-down session
    StaleParticipant,
    /// Opponent left the match
    OpponentDisconnected,

    // Transport
    /// Frame could not be decoded
    BadRequest,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FighterUnavailable => "FIGHTER_UNAVAILABLE",
            Self::UnknownFighter => "UNKNOWN_FIGHTER",
            Self::FighterAlreadyChosen => "FIGHTER_ALREADY_CHOSEN",
            Self::FighterRequired => "FIGHTER_REQUIRED",
            Self::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            Self::InvalidPart => "INVALID_PART",
            Self::NotInMatch => "NOT_IN_MATCH",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::StaleParticipant => "STALE_PARTICIPANT",
            Self::OpponentDisconnected => "OPPONENT_DISCONNECTED",
            Self::BadRequest => "BAD_REQUEST",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
