//! Wire protocol shared by the WebSocket layer and the arena services.

pub mod messages;
pub mod views;

pub use messages::{ClientMsg, RawAction, ServerMsg, PROTOCOL_VERSION};
pub use views::{
    ErrorView, GameOverView, PlayerView, RoundPlayerView, RoundResultView, WelcomeView, Winner,
};
