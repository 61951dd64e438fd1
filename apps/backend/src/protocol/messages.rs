use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FighterCatalogEntry, ParticipantId};
use crate::protocol::views::{ErrorView, GameOverView, PlayerView, RoundResultView, WelcomeView};

pub const PROTOCOL_VERSION: i32 = 1;

/// Raw attack/block names as sent by the client; validated into an `Action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAction {
    pub attack: String,
    pub block: String,
}

/// Inbound frames: `{"type": "<event>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMsg {
    SelectCharacter(String),
    PlayerReady,
    PlayerAction(RawAction),
}

/// Outbound frames, same envelope as inbound.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMsg {
    Welcome(WelcomeView),
    UpdateAvailableCharacters(Vec<FighterCatalogEntry>),
    CharacterSelected(FighterCatalogEntry),
    CharacterUnavailable(String),
    OpponentCharacter(FighterCatalogEntry),
    EquipmentAssigned(Vec<String>),
    OpponentEquipment(Vec<String>),
    UpdatePlayers(BTreeMap<ParticipantId, PlayerView>),
    OpponentLeft,
    StartGame,
    ActionAccepted { round: u32 },
    RoundResult(RoundResultView),
    GameOver(GameOverView),
    Error(ErrorView),
}

impl ServerMsg {
    /// Wire name of this frame, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::Welcome(_) => "welcome",
            ServerMsg::UpdateAvailableCharacters(_) => "updateAvailableCharacters",
            ServerMsg::CharacterSelected(_) => "characterSelected",
            ServerMsg::CharacterUnavailable(_) => "characterUnavailable",
            ServerMsg::OpponentCharacter(_) => "opponentCharacter",
            ServerMsg::EquipmentAssigned(_) => "equipmentAssigned",
            ServerMsg::OpponentEquipment(_) => "opponentEquipment",
            ServerMsg::UpdatePlayers(_) => "updatePlayers",
            ServerMsg::OpponentLeft => "opponentLeft",
            ServerMsg::StartGame => "startGame",
            ServerMsg::ActionAccepted { .. } => "actionAccepted",
            ServerMsg::RoundResult(_) => "roundResult",
            ServerMsg::GameOver(_) => "gameOver",
            ServerMsg::Error(_) => "error",
        }
    }
}
